//! コンポーネントレジストリ
//!
//! ローカルの `public/h/` を優先し、見つからなければリモートから取得する。

mod client;
mod component;
mod name;

pub use client::RegistryClient;
pub use component::{Component, ComponentSummary, CssVars, RegistryIndex};
pub use name::normalize_name;

#[cfg(test)]
pub use component::ComponentFile;
