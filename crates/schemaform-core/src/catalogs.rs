use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::EditorKind;

/// Compiler and output format version constants.
pub const COMPILER_VERSION: &str = "0.3.0";
pub const CONFIG_VERSION: &str = "1.0";

/// Upper bound on optional/nullable/default layers walked before giving up.
pub const MAX_UNWRAP_DEPTH: usize = 10;

/// Sort order assigned to fields that declare none; sorts them last.
pub const DEFAULT_SORT_ORDER: i64 = 1000;

/// Sort key of the default fieldset.
pub const DEFAULT_FIELDSET_SORT: i64 = 0;
pub const DEFAULT_FIELDSET_ID: &str = "default";
pub const DEFAULT_FIELDSET_LABEL: &str = "General";

/// Column span used by long-text editors.
pub const FULL_WIDTH_COL_SPAN: u8 = 12;

/// Strings longer than this get a textarea.
pub const LONG_TEXT_THRESHOLD: u64 = 255;

// ---------------------------------------------------------------------------
// Metadata annotation keys
// ---------------------------------------------------------------------------

pub mod keys {
    // Display
    pub const LABEL: &str = "x-label";
    pub const PLURAL_LABEL: &str = "x-plural-label";
    pub const HIDDEN: &str = "x-hidden";
    pub const SORT_ORDER: &str = "x-sort-order";
    pub const FIELD_GROUP: &str = "x-field-group";
    pub const GROUP_COLLAPSIBLE: &str = "x-group-collapsible";
    pub const GROUP_COLLAPSED: &str = "x-group-collapsed";
    pub const COL_SPAN: &str = "x-col-span";
    pub const PLACEHOLDER: &str = "x-placeholder";
    pub const HELP_TEXT: &str = "x-help-text";
    pub const TOOLTIP: &str = "x-tooltip";
    pub const ICON: &str = "x-icon";
    pub const DATE_FORMAT: &str = "x-date-format";
    pub const TRUE_LABEL: &str = "x-true-label";
    pub const FALSE_LABEL: &str = "x-false-label";
    pub const TRUE_SEVERITY: &str = "x-true-severity";
    pub const FALSE_SEVERITY: &str = "x-false-severity";
    pub const CURRENCY_CODE: &str = "x-currency-code";
    pub const LOCALE: &str = "x-locale";
    pub const MIN_FRACTION_DIGITS: &str = "x-min-fraction-digits";
    pub const MAX_FRACTION_DIGITS: &str = "x-max-fraction-digits";

    // Editing
    pub const READONLY: &str = "x-readonly";
    pub const ENTITY_READONLY: &str = "x-entity-readonly";
    pub const FORMAT: &str = "x-format";
    pub const CURRENCY: &str = "x-currency";
    pub const OPTIONS: &str = "x-options";
    pub const MULTIPLE: &str = "x-multiple";
    pub const CUSTOM_RENDERER: &str = "x-custom-renderer";
    pub const RENDERER_PROPS: &str = "x-renderer-props";
    pub const DEFAULT: &str = "x-default";

    // Validation
    pub const MIN: &str = "x-min";
    pub const MAX: &str = "x-max";
    pub const MIN_LENGTH: &str = "x-min-length";
    pub const MAX_LENGTH: &str = "x-max-length";
    pub const PATTERN: &str = "x-pattern";
    pub const VALIDATION_MESSAGE: &str = "x-validation-message";

    // Navigation
    pub const NAVIGATION_KEY: &str = "x-navigation-key";
    pub const NAVIGATION_TARGET: &str = "x-navigation-target";
    pub const NAVIGATION_RELATION: &str = "x-navigation-relation";
    pub const NAVIGATION_DISPLAY_FIELD: &str = "x-navigation-display-field";
    pub const NAVIGATION_VALUE_FIELD: &str = "x-navigation-value-field";

    // Entity-level
    pub const PRIMARY_KEY: &str = "x-primary-key";
    pub const SAVE_MODEL: &str = "x-save-model";
    pub const DISPLAY_FIELD: &str = "x-display-field";
    pub const ROUTE_PATH: &str = "x-route-path";
    pub const LIST_PATH: &str = "x-list-path";
    pub const CREATABLE: &str = "x-creatable";
    pub const DELETABLE: &str = "x-deletable";
    pub const SELECTABLE: &str = "x-selectable";
    pub const CREATED_ON_FIELD: &str = "x-created-on-field";
    pub const CREATED_BY_FIELD: &str = "x-created-by-field";
    pub const UPDATED_ON_FIELD: &str = "x-updated-on-field";
    pub const UPDATED_BY_FIELD: &str = "x-updated-by-field";
    pub const SOFT_DELETE_FIELD: &str = "x-soft-delete-field";
}

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Abbreviations re-expanded to upper case after label formatting.
pub static ABBREVIATIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("Id", "ID"),
        ("Ids", "IDs"),
        ("Url", "URL"),
        ("Uri", "URI"),
        ("Api", "API"),
        ("Ip", "IP"),
        ("Sku", "SKU"),
        ("Vat", "VAT"),
        ("Iban", "IBAN"),
        ("Html", "HTML"),
        ("Json", "JSON"),
        ("Pdf", "PDF"),
        ("Uuid", "UUID"),
    ])
});

/// Named custom renderers with a dedicated editor kind.
/// Names not in this table render as [`EditorKind::Custom`].
pub static RENDERER_CATALOG: LazyLock<HashMap<&'static str, EditorKind>> = LazyLock::new(|| {
    HashMap::from([
        ("richtext", EditorKind::RichText),
        ("markdown", EditorKind::Markdown),
        ("code", EditorKind::Code),
        ("json", EditorKind::Json),
        ("color", EditorKind::Color),
        ("rating", EditorKind::Rating),
        ("slider", EditorKind::Slider),
        ("toggle", EditorKind::Toggle),
        ("file", EditorKind::File),
        ("image", EditorKind::Image),
        ("tags", EditorKind::Chips),
    ])
});

/// Conventional audit field names, in lookup priority order.
pub const CREATED_ON_NAMES: &[&str] = &["createdOn", "createdAt"];
pub const CREATED_BY_NAMES: &[&str] = &["createdBy"];
pub const UPDATED_ON_NAMES: &[&str] = &["updatedOn", "updatedAt", "modifiedOn"];
pub const UPDATED_BY_NAMES: &[&str] = &["updatedBy", "modifiedBy"];
pub const SOFT_DELETE_NAMES: &[&str] = &["isDeleted"];

/// Field that receives an implicit `true` default when nothing else sets one.
pub const ACTIVE_FLAG_FIELD: &str = "isActive";

/// Leading and trailing identifier tokens stripped when deriving entity labels.
pub const READ_MODEL_PREFIX: &str = "Query";
pub const READ_MODEL_SUFFIX: &str = "Model";
pub const SAVE_MODEL_PREFIX: &str = "Save";
