//! Assignment context formatting and error context windows.

use tracing::{debug, warn};

use essaypilot_protocols::{ErrorContext, HostPage, PageContext, PageError};

/// Words shown on each side of an error on the decision surface.
pub const CONTEXT_WORDS: usize = 5;

const CONTEXT_HEADER: &str = "--- CONTEXTO DA PÁGINA ---\n";
const CONTEXT_FOOTER: &str = "--- FIM DO CONTEXTO ---";

/// Labelled block fed to the generation prompt. `None` when the page had
/// none of the fields.
pub fn format_context(context: &PageContext) -> Option<String> {
    let fields = [
        ("GÊNERO TEXTUAL", &context.genre),
        ("TEMA", &context.theme),
        ("PROPOSTA DETALHADA", &context.proposal),
        ("TEXTOS DE APOIO", &context.support_texts),
    ];

    let mut formatted = String::from(CONTEXT_HEADER);
    let mut found = false;
    for (label, value) in fields {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            formatted.push_str(&format!("{label}:\n{value}\n\n"));
            found = true;
        }
    }
    formatted.push_str(CONTEXT_FOOTER);

    found.then_some(formatted)
}

/// Scrape and format the assignment context below `root_selector`.
pub async fn extract_context(
    page: &dyn HostPage,
    root_selector: &str,
) -> Result<Option<String>, PageError> {
    let context = page.extract_context(root_selector).await?;
    let formatted = format_context(&context);
    match &formatted {
        Some(_) => debug!("Page context extracted"),
        None => warn!("No assignment context found on the page"),
    }
    Ok(formatted)
}

/// Up to `before` words preceding and `after` words following the first
/// occurrence of `error` in `text`, whitespace preserved. Falls back to an
/// empty window when the error words do not appear as whole tokens.
pub fn error_context(text: &str, error: &str, before: usize, after: usize) -> ErrorContext {
    let tokens = split_keep_whitespace(text);
    let needle = split_keep_whitespace(error.trim());

    let start = (needle.len() <= tokens.len())
        .then(|| {
            (0..=tokens.len() - needle.len())
                .find(|&i| tokens[i..i + needle.len()] == needle[..])
        })
        .flatten();

    let Some(start) = start else {
        return ErrorContext {
            before: String::new(),
            error: error.to_string(),
            after: String::new(),
        };
    };
    let end = start + needle.len();

    let mut preceding = Vec::new();
    let mut counted = 0;
    for token in tokens[..start].iter().rev() {
        if counted >= before {
            break;
        }
        preceding.push(*token);
        if !token.trim().is_empty() {
            counted += 1;
        }
    }
    preceding.reverse();

    let mut following = Vec::new();
    let mut counted = 0;
    for token in &tokens[end..] {
        if counted >= after {
            break;
        }
        following.push(*token);
        if !token.trim().is_empty() {
            counted += 1;
        }
    }

    ErrorContext {
        before: preceding.concat(),
        error: error.to_string(),
        after: following.concat(),
    }
}

/// Alternating word and whitespace runs, always starting and ending with a
/// (possibly empty) word run.
fn split_keep_whitespace(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (i, ch) in s.char_indices() {
        let space = ch.is_whitespace();
        if space != in_space {
            parts.push(&s[start..i]);
            start = i;
            in_space = space;
        }
    }
    parts.push(&s[start..]);
    if in_space {
        parts.push("");
    }
    parts
}
