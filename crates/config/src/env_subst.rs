/// Replace `${ENV_VAR}` and `${ENV_VAR:-fallback}` placeholders in a config
/// string.
///
/// Unresolvable variables without a fallback are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Placeholder substitution with a custom lookup, so it can be tested without
/// touching the process environment.
pub(crate) fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated: emit the remainder verbatim.
            result.push_str(&rest[start..]);
            return result;
        };

        let inner = &after[..end];
        let (name, fallback) = match inner.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (inner, None),
        };

        match (name.is_empty(), lookup(name).filter(|v| !v.is_empty()), fallback) {
            (false, Some(value), _) => result.push_str(&value),
            (false, None, Some(fallback)) => result.push_str(fallback),
            _ => {
                result.push_str("${");
                result.push_str(inner);
                result.push('}');
            },
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "FOODLENS_TEST_TOKEN" => Some("tok-123".to_string()),
            "FOODLENS_EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with("token = \"${FOODLENS_TEST_TOKEN}\"", lookup),
            "token = \"tok-123\""
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env_with("${FOODLENS_NONEXISTENT_XYZ}", lookup),
            "${FOODLENS_NONEXISTENT_XYZ}"
        );
    }

    #[test]
    fn uses_fallback_for_missing_or_empty() {
        assert_eq!(
            substitute_env_with("${FOODLENS_MISSING:-gpt-4o-mini}", lookup),
            "gpt-4o-mini"
        );
        assert_eq!(substitute_env_with("${FOODLENS_EMPTY:-x}", lookup), "x");
        assert_eq!(
            substitute_env_with("${FOODLENS_TEST_TOKEN:-unused}", lookup),
            "tok-123"
        );
    }

    #[test]
    fn multiple_placeholders_and_unicode() {
        assert_eq!(
            substitute_env_with("儲存=${FOODLENS_TEST_TOKEN}/${FOODLENS_TEST_TOKEN}", lookup),
            "儲存=tok-123/tok-123"
        );
    }

    #[test]
    fn unterminated_is_literal() {
        assert_eq!(substitute_env_with("a ${OPEN", lookup), "a ${OPEN");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }
}
