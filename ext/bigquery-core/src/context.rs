/// Which converter table applies to a value.
///
/// The two tables only differ for TIMESTAMP: stored rows use epoch
/// microseconds on the way in and RFC 3339 with a `Z` suffix on the way out,
/// query parameters use `YYYY-MM-DD HH:MM:SS[.ffffff]+00:00` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WireContext {
    #[default]
    Row,
    QueryParameter,
}
