use std::sync::LazyLock;

use regex::Regex;

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Collapse whitespace before parsing.
///
/// CRLF becomes LF, runs of spaces/tabs become one space, three or more
/// consecutive newlines become exactly two, and the result is trimmed.
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = text.replace("\r\n", "\n");
    let text = SPACE_RUNS.replace_all(&text, " ");
    let text = NEWLINE_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_crlf_to_lf() {
        assert_eq!(normalize("uno\r\ndos"), "uno\ndos");
    }

    #[test]
    fn collapses_spaces_and_tabs() {
        assert_eq!(normalize("uno   dos\t\ttres \t cuatro"), "uno dos tres cuatro");
    }

    #[test]
    fn caps_newline_runs_at_two() {
        assert_eq!(normalize("uno\n\n\n\n\ndos"), "uno\n\ndos");
        assert_eq!(normalize("uno\n\ndos"), "uno\n\ndos");
        assert_eq!(normalize("uno\ndos"), "uno\ndos");
    }

    #[test]
    fn trims_leading_and_trailing_whitespace() {
        assert_eq!(normalize("  \n contrato \n  "), "contrato");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\n  "), "");
    }

    #[test]
    fn idempotent_on_varied_inputs() {
        let samples = [
            "CONTRATO\r\n\r\n\r\nNÚMERO   641234567\t\tPEMEX",
            "  a \n\n\n b \r\n c  ",
            "ya normalizado\n\ncon dos líneas",
            "",
            "\t\t\t",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
