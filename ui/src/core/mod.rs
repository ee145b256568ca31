//! Platform glue shared by the i18n layer: timers, task spawning and
//! local persistence.

pub mod platform;
pub mod storage;
pub mod timing;
