use crate::error::Result;
use crate::models::NewFilterRule;

use super::template::Template;

const DEFAULT_FILTERS: &str = include_str!("../../assets/default-filters.json");

/// The bundled default rule set, in seeding order.
pub(crate) fn default_filters() -> Result<Vec<NewFilterRule>> {
    let bundle = Template::parse(DEFAULT_FILTERS)?;
    bundle
        .filters
        .into_iter()
        .map(|entry| -> Result<NewFilterRule> { Ok(entry.into_filter()?.into_new()) })
        .collect()
}
