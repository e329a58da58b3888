// product_widget/src/config.rs

//! Widget configuration: storage names shared with the host app, timings, and
//! the discount policy for structured documents.

use crate::error::{WidgetError, WidgetResult};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PACKAGE_NAME: &str = "com.melamine_elsherif";
pub const DEFAULT_APP_GROUP: &str = "group.com.melamine.elsherif.widget";
pub const DEFAULT_UPDATE_ACTION: &str = "com.melamine_elsherif.UPDATE_WIDGET";

/// How a structured document's explicit discount flag interacts with its
/// regular price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscountPolicy {
  /// Use the document's `product_has_discount` as-is.
  #[default]
  Literal,
  /// A non-empty regular price forces the discount on.
  RegularPriceImplies,
}

impl FromStr for DiscountPolicy {
  type Err = WidgetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "literal" => Ok(DiscountPolicy::Literal),
      "regular-price-implies" | "regular_price_implies" => Ok(DiscountPolicy::RegularPriceImplies),
      other => Err(WidgetError::Config {
        key: "PRODUCT_WIDGET_DOCUMENT_DISCOUNT_POLICY".to_string(),
        message: format!("unknown policy '{}' (expected 'literal' or 'regular-price-implies')", other),
      }),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
  /// Delay between an update broadcast and the refresh it triggers.
  pub debounce: Duration,
  /// Longest a burst of update broadcasts may postpone the refresh.
  pub debounce_max_wait: Duration,
  /// Timeline reload interval.
  pub refresh_interval: Duration,
  pub image_timeout: Duration,
  /// Android package name; also the app-specific storage area name.
  pub package_name: String,
  /// iOS app group suite shared with the host app.
  pub app_group: String,
  /// Custom broadcast action requesting an out-of-cycle refresh.
  pub update_action: String,
  pub document_discount_policy: DiscountPolicy,
}

impl Default for WidgetConfig {
  fn default() -> Self {
    Self {
      debounce: Duration::from_millis(500),
      debounce_max_wait: Duration::from_millis(2000),
      refresh_interval: Duration::from_secs(3600),
      image_timeout: Duration::from_secs(15),
      package_name: DEFAULT_PACKAGE_NAME.to_string(),
      app_group: DEFAULT_APP_GROUP.to_string(),
      update_action: DEFAULT_UPDATE_ACTION.to_string(),
      document_discount_policy: DiscountPolicy::default(),
    }
  }
}

impl WidgetConfig {
  /// Loads overrides from `PRODUCT_WIDGET_*` variables (and an optional `.env`).
  pub fn from_env() -> WidgetResult<Self> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds a config from an arbitrary variable lookup. Unset variables keep
  /// their defaults.
  pub fn from_lookup<F>(lookup: F) -> WidgetResult<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = Self::default();

    if let Some(ms) = parse_var::<u64, _>(&lookup, "PRODUCT_WIDGET_DEBOUNCE_MS")? {
      config.debounce = Duration::from_millis(ms);
    }
    if let Some(ms) = parse_var::<u64, _>(&lookup, "PRODUCT_WIDGET_DEBOUNCE_MAX_WAIT_MS")? {
      config.debounce_max_wait = Duration::from_millis(ms);
    }
    if let Some(secs) = parse_var::<u64, _>(&lookup, "PRODUCT_WIDGET_REFRESH_INTERVAL_SECS")? {
      if secs == 0 {
        return Err(WidgetError::Config {
          key: "PRODUCT_WIDGET_REFRESH_INTERVAL_SECS".to_string(),
          message: "refresh interval must be greater than zero".to_string(),
        });
      }
      let representable = i64::try_from(secs)
        .ok()
        .and_then(chrono::TimeDelta::try_seconds)
        .and_then(|interval| chrono::Utc::now().checked_add_signed(interval))
        .is_some();
      if !representable {
        return Err(WidgetError::Config {
          key: "PRODUCT_WIDGET_REFRESH_INTERVAL_SECS".to_string(),
          message: format!("refresh interval of {} seconds is out of range", secs),
        });
      }
      config.refresh_interval = Duration::from_secs(secs);
    }
    if let Some(ms) = parse_var::<u64, _>(&lookup, "PRODUCT_WIDGET_IMAGE_TIMEOUT_MS")? {
      config.image_timeout = Duration::from_millis(ms);
    }
    if let Some(name) = non_empty_var(&lookup, "PRODUCT_WIDGET_PACKAGE_NAME") {
      config.package_name = name;
    }
    if let Some(group) = non_empty_var(&lookup, "PRODUCT_WIDGET_APP_GROUP") {
      config.app_group = group;
    }
    if let Some(action) = non_empty_var(&lookup, "PRODUCT_WIDGET_UPDATE_ACTION") {
      config.update_action = action;
    }
    if let Some(policy) = non_empty_var(&lookup, "PRODUCT_WIDGET_DOCUMENT_DISCOUNT_POLICY") {
      config.document_discount_policy = policy.parse()?;
    }

    tracing::debug!(config = ?config, "Widget configuration loaded.");
    Ok(config)
  }
}

fn non_empty_var<F>(lookup: &F, name: &str) -> Option<String>
where
  F: Fn(&str) -> Option<String>,
{
  lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T, F>(lookup: &F, name: &str) -> WidgetResult<Option<T>>
where
  T: FromStr,
  T::Err: std::fmt::Display,
  F: Fn(&str) -> Option<String>,
{
  match non_empty_var(lookup, name) {
    None => Ok(None),
    Some(raw) => raw.parse::<T>().map(Some).map_err(|e| WidgetError::Config {
      key: name.to_string(),
      message: format!("invalid value '{}': {}", raw, e),
    }),
  }
}
