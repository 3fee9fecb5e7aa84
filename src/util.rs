//! Miscellaneous utility functionality, nothing in here knows about cali.
use macro_pub::macro_pub;

/// Builds a `HashMap` from `key => value` pairs. `HashMap` has to be in scope
/// at the call site.
///
/// A later duplicate key overwrites the earlier one.
#[macro_pub]
macro_rules! map {
    ($($key:expr => $value:expr),* $(,)?) => {
        HashMap::from([$(($key, $value)),*])
    }
}
