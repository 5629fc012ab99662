//! Domain query normalization shared by the availability check.

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Trim, lowercase, then drop leading schemes and `www.` labels until none
/// remain.
///
/// Stripping to a fixed point keeps the function idempotent.
pub fn normalize(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut rest = lowered.as_str();

    loop {
        let stripped = SCHEMES
            .iter()
            .chain(std::iter::once(&"www."))
            .find_map(|prefix| rest.strip_prefix(prefix));
        match stripped {
            Some(next) => rest = next,
            None => break,
        }
    }

    rest.to_string()
}

/// A normalized query must contain a dot and be at least three characters.
pub fn is_plausible(domain: &str) -> bool {
    domain.contains('.') && domain.chars().count() >= 3
}
