pub(crate) mod clock;
pub(crate) mod output;
pub(crate) mod player;
pub(crate) mod ticker;

#[cfg(test)]
#[path = "../tests/unit/playback/support.rs"]
pub(crate) mod test_support;
