// ISO-8601 style video durations (PT#H#M#S, P#DT#H#M#S)
use regex::Regex;
use std::sync::LazyLock;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(?<d>\d+)D)?(?:T(?:(?<h>\d+)H)?(?:(?<m>\d+)M)?(?:(?<s>\d+)S)?)?$")
        .expect("Failed to compile duration regex")
});

/// Total seconds in a duration string. Anything that does not match yields 0.
pub fn parse_duration_seconds(raw: &str) -> u64 {
    let Some(captures) = DURATION_PATTERN.captures(raw.trim()) else {
        return 0;
    };

    let group = |name: &str| -> u64 {
        captures
            .name(name)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    group("d")
        .saturating_mul(86_400)
        .saturating_add(group("h").saturating_mul(3_600))
        .saturating_add(group("m").saturating_mul(60))
        .saturating_add(group("s"))
}
