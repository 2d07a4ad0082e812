/*!
 * Generated front-end artifacts.
 */

pub mod templates;

pub use templates::{GeneratedFile, plan_files, resources_summary};
