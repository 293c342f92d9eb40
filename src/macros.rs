#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! re {
    ($pat:literal) => {
        $crate::Pattern::Regex($crate::regex!($pat))
    };
}

#[macro_export]
macro_rules! rule {
    (
        name: $name:expr,
        kind: $kind:expr,
        pattern: $pat:expr
        $(, optional_phrases: [ $($opt_phrase:expr),* $(,)? ])?
        $(, buckets: $buckets:expr)?
        $(, priority: $priority:expr)?
        , prod: |$caps:ident, $line:ident| $body:block
        $(,)?
    ) => {{
        $crate::Rule {
            name: ::std::borrow::Cow::from($name),
            kind: $kind,
            pattern: $pat,
            production: Box::new(move |$caps: &regex::Captures<'_>, $line: &str| -> Option<$crate::LineMatch> {
                $body
            }),
            optional_phrases: &[ $($($opt_phrase),*)? ],
            buckets: { 0 $(| $buckets)? },
            priority: { 0 $(+ $priority)? },
        }
    }};
}
