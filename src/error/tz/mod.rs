pub(crate) mod db;
pub(crate) mod offset;
pub(crate) mod rule;
