//! Default values and functions for configuration

// Query parameter keys used by spatie/laravel-query-builder out of the box
pub(crate) const DEFAULT_INCLUDE_KEY: &str = "include";
pub(crate) const DEFAULT_FILTER_KEY: &str = "filter";
pub(crate) const DEFAULT_SORT_KEY: &str = "sort";
pub(crate) const DEFAULT_FIELDS_KEY: &str = "fields";

pub(crate) const DEFAULT_ANNOTATION_TAG: &str = "@queryParam";

pub(crate) fn default_include_key() -> String {
    DEFAULT_INCLUDE_KEY.to_string()
}

pub(crate) fn default_filter_key() -> String {
    DEFAULT_FILTER_KEY.to_string()
}

pub(crate) fn default_sort_key() -> String {
    DEFAULT_SORT_KEY.to_string()
}

pub(crate) fn default_fields_key() -> String {
    DEFAULT_FIELDS_KEY.to_string()
}

pub(crate) fn default_annotation_tag() -> String {
    DEFAULT_ANNOTATION_TAG.to_string()
}

pub(crate) fn default_emit_unsupported() -> bool {
    false
}

pub(crate) fn default_true() -> bool {
    true
}
