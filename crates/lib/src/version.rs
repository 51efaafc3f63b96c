//! Version tags attached to modules and targets.
//!
//! Both tags carry a `Latest` alias that resolves to the newest concrete
//! version. Compatibility is always checked on the resolved version: a module
//! satisfies a target when its declared version is at least the target's.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Common behaviour of ordered version tags.
pub trait VersionTag: Copy + fmt::Display {
  /// Position of the resolved version, oldest first.
  fn rank(self) -> u8;

  /// Whether a module declaring `self` can be built by a target requiring `required`.
  fn satisfies(self, required: Self) -> bool {
    self.rank() >= required.rank()
  }
}

/// Engine header include-order version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncludeOrderVersion {
  #[default]
  Unreal5_0,
  Unreal5_1,
  Unreal5_2,
  Unreal5_3,
  Unreal5_4,
  Latest,
}

impl IncludeOrderVersion {
  pub const NEWEST: Self = Self::Unreal5_4;

  /// Resolve the `Latest` alias.
  pub fn resolve(self) -> Self {
    match self {
      Self::Latest => Self::NEWEST,
      v => v,
    }
  }
}

impl VersionTag for IncludeOrderVersion {
  fn rank(self) -> u8 {
    match self.resolve() {
      Self::Unreal5_0 => 0,
      Self::Unreal5_1 => 1,
      Self::Unreal5_2 => 2,
      Self::Unreal5_3 => 3,
      Self::Unreal5_4 | Self::Latest => 4,
    }
  }
}

impl fmt::Display for IncludeOrderVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Unreal5_0 => "Unreal5_0",
      Self::Unreal5_1 => "Unreal5_1",
      Self::Unreal5_2 => "Unreal5_2",
      Self::Unreal5_3 => "Unreal5_3",
      Self::Unreal5_4 => "Unreal5_4",
      Self::Latest => "Latest",
    };
    write!(f, "{}", s)
  }
}

/// Default build settings version of a target or module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildSettingsVersion {
  #[default]
  V1,
  V2,
  V3,
  V4,
  Latest,
}

impl BuildSettingsVersion {
  pub const NEWEST: Self = Self::V4;

  /// Resolve the `Latest` alias.
  pub fn resolve(self) -> Self {
    match self {
      Self::Latest => Self::NEWEST,
      v => v,
    }
  }
}

impl VersionTag for BuildSettingsVersion {
  fn rank(self) -> u8 {
    match self.resolve() {
      Self::V1 => 0,
      Self::V2 => 1,
      Self::V3 => 2,
      Self::V4 | Self::Latest => 3,
    }
  }
}

impl fmt::Display for BuildSettingsVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::V1 => "V1",
      Self::V2 => "V2",
      Self::V3 => "V3",
      Self::V4 => "V4",
      Self::Latest => "Latest",
    };
    write!(f, "{}", s)
  }
}
