//! Token resolution for output paths and file names
//!
//! Templates may contain `$NAME`-style tokens that are substituted against a
//! [`TokenContext`]. Substitution runs in a fixed priority order so that
//! longer tokens are replaced before their prefixes (`$VERSION_CODE_LONG`
//! before `$VERSION_CODE` before `$VERSION`, `$DATE_YEAR` before `$DATE`).
//! Unrecognized tokens pass through untouched.

use chrono::NaiveDateTime;

/// Recognized tokens, in substitution priority order.
pub const RECOGNIZED_TOKENS: [&str; 15] = [
    "$IDENTIFIER",
    "$NAME",
    "$PLATFORM",
    "$VERSION_CODE_LONG",
    "$VERSION_CODE",
    "$VERSION",
    "$DATE_YEAR",
    "$DATE_MONTH",
    "$DATE_DAY",
    "$DATE",
    "$TIME_HOUR",
    "$TIME_MINUTES",
    "$TIME_SECONDS",
    "$TIME",
    "$EXECUTABLE",
];

/// Everything a template substitution needs, captured up front.
///
/// The timestamp is injected by the caller; this module never reads the
/// system clock.
#[derive(Debug, Clone)]
pub struct TokenContext {
    /// Application bundle identifier
    pub identifier: String,
    /// Product name, already sanitized for use in paths
    pub product_name: String,
    /// Platform label (`Windows64`, `iOS`, ...)
    pub platform_label: String,
    /// Composite version code (see [`crate::version`])
    pub composite_version_code: String,
    /// Raw per-release version code
    pub version_code: u32,
    /// Raw version string
    pub version: String,
    /// Build timestamp
    pub timestamp: NaiveDateTime,
    /// Platform-appropriate executable suffix, including the leading dot
    pub executable_suffix: String,
}

impl TokenContext {
    /// Resolve every recognized token in `template`.
    pub fn resolve(&self, template: &str) -> String {
        let t = &self.timestamp;

        let mut out = template.to_string();
        out = out.replace("$IDENTIFIER", &self.identifier);
        out = out.replace("$NAME", &self.product_name);
        out = out.replace("$PLATFORM", &self.platform_label);

        out = out.replace("$VERSION_CODE_LONG", &self.composite_version_code);
        out = out.replace("$VERSION_CODE", &self.version_code.to_string());
        out = out.replace("$VERSION", &self.version);

        out = out.replace("$DATE_YEAR", &t.format("%Y").to_string());
        out = out.replace("$DATE_MONTH", &t.format("%-m").to_string());
        out = out.replace("$DATE_DAY", &t.format("%-d").to_string());
        out = out.replace("$DATE", &t.format("%Y-%-m-%-d").to_string());

        out = out.replace("$TIME_HOUR", &t.format("%H").to_string());
        out = out.replace("$TIME_MINUTES", &t.format("%M").to_string());
        out = out.replace("$TIME_SECONDS", &t.format("%S").to_string());
        out = out.replace("$TIME", &t.format("%H-%M-%S").to_string());

        out.replace("$EXECUTABLE", &self.executable_suffix)
    }
}

/// Replace characters that are unsafe in file names with underscores.
pub fn sanitize_product_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn context() -> TokenContext {
        TokenContext {
            identifier: "com.example.app".to_string(),
            product_name: "My_App".to_string(),
            platform_label: "Windows64".to_string(),
            composite_version_code: "1000001".to_string(),
            version_code: 1,
            version: "1.0.0".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2026, 3, 5)
                .unwrap()
                .and_hms_opt(9, 4, 2)
                .unwrap(),
            executable_suffix: ".exe".to_string(),
        }
    }

    #[test]
    fn test_no_tokens_is_identity() {
        let ctx = context();
        assert_eq!(ctx.resolve("Build/plain-path"), "Build/plain-path");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let ctx = context();
        assert_eq!(ctx.resolve("$UNKNOWN/$NAME"), "$UNKNOWN/My_App");
    }

    #[test]
    fn test_long_code_resolves_before_short_forms() {
        let ctx = context();
        assert_eq!(
            ctx.resolve("$VERSION_CODE_LONG-$VERSION_CODE"),
            "1000001-1"
        );
        assert_eq!(ctx.resolve("$VERSION_CODE-$VERSION"), "1-1.0.0");
    }

    #[test]
    fn test_no_recognized_token_survives_one_pass() {
        let ctx = context();
        let template = RECOGNIZED_TOKENS.join("/");
        let resolved = ctx.resolve(&template);
        for token in RECOGNIZED_TOKENS {
            assert!(
                !resolved.contains(token),
                "residual token {token} in {resolved}"
            );
        }
    }

    #[rstest]
    #[case("$DATE_YEAR", "2026")]
    #[case("$DATE_MONTH", "3")]
    #[case("$DATE_DAY", "5")]
    #[case("$DATE", "2026-3-5")]
    #[case("$TIME_HOUR", "09")]
    #[case("$TIME_MINUTES", "04")]
    #[case("$TIME_SECONDS", "02")]
    #[case("$TIME", "09-04-02")]
    fn test_date_time_tokens(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(context().resolve(template), expected);
    }

    #[test]
    fn test_full_file_name_template() {
        let ctx = context();
        assert_eq!(
            ctx.resolve("$IDENTIFIER_$VERSION_$VERSION_CODE_LONG$EXECUTABLE"),
            "com.example.app_1.0.0_1000001.exe"
        );
    }

    #[rstest]
    #[case("My App", "My_App")]
    #[case("a/b\\c:d", "a_b_c_d")]
    #[case("*?\"<>|", "______")]
    #[case("Clean-Name", "Clean-Name")]
    fn test_sanitize_product_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_product_name(input), expected);
    }
}
