//! NG word matching: case-sensitive, literal substring containment.

/// True iff `phrase` is non-empty and occurs in `body`.
pub fn matches(body: &str, phrase: &str) -> bool {
    !phrase.is_empty() && body.contains(phrase)
}

/// The first phrase of `phrases` found in `body`, if any.
pub fn first_match<'a, I>(body: &str, phrases: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    phrases.into_iter().find(|phrase| matches(body, phrase))
}

pub fn any_match<'a, I>(body: &str, phrases: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    first_match(body, phrases).is_some()
}
