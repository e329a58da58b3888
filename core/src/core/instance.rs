// product_widget/src/core/instance.rs

use std::fmt;

/// Identifier of one placed widget instance, as assigned by the platform's
/// widget registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub i32);

impl fmt::Display for InstanceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "widget#{}", self.0)
  }
}

impl From<i32> for InstanceId {
  fn from(id: i32) -> Self {
    InstanceId(id)
  }
}
