//! Single-field definition builder.
//!
//! Everything here is a pure function of the field name, its schema node,
//! whether the caller may edit it, and its metadata bag. Precedence for each
//! derived property is fixed; see the individual `resolve_*` helpers.

use serde_json::Value;

use crate::catalogs::{
    keys, DEFAULT_SORT_ORDER, FULL_WIDTH_COL_SPAN, LONG_TEXT_THRESHOLD, RENDERER_CATALOG,
};
use crate::classify::{classify, Classified};
use crate::metadata::MetadataBag;
use crate::naming::{format_label, suggests_currency};
use crate::schema::SchemaNode;
use crate::types::*;
use crate::unwrap::{unwrap_node, Unwrapped};

/// Inputs for building one field definition.
#[derive(Debug, Clone, Copy)]
pub struct FieldInput<'a> {
    /// Identity in the compiled configuration (`parent.member` for nested fields).
    pub name: &'a str,
    /// Name the label is derived from when no explicit label exists.
    pub label_source: &'a str,
    pub node: &'a SchemaNode,
    pub editable: bool,
    pub primary_key: bool,
}

impl<'a> FieldInput<'a> {
    pub fn new(name: &'a str, node: &'a SchemaNode, editable: bool) -> Self {
        FieldInput {
            name,
            label_source: name,
            node,
            editable,
            primary_key: false,
        }
    }
}

pub fn build_field(input: FieldInput<'_>) -> FieldDefinition {
    let unwrapped = unwrap_node(input.node);
    let classified = classify(unwrapped.base);
    build_from_parts(input, &unwrapped, &classified)
}

pub(crate) fn build_from_parts(
    input: FieldInput<'_>,
    unwrapped: &Unwrapped<'_>,
    classified: &Classified<'_>,
) -> FieldDefinition {
    let meta = &unwrapped.meta;

    let label = resolve_label(meta, input.label_source);
    let hidden = meta.flag(keys::HIDDEN);
    let explicit_read_only = meta.flag(keys::READONLY);
    let options = resolve_options(meta, classified);
    let navigation = resolve_navigation(meta);
    let renderer = resolve_renderer(meta);
    let validation = resolve_validation(input, unwrapped, classified, hidden);

    let editor = resolve_editor(EditorInputs {
        name: input.name,
        meta,
        classified,
        editable: input.editable,
        explicit_read_only,
        has_options: options.is_some(),
        navigation: navigation.as_ref(),
        renderer: renderer.as_ref(),
        max_length: validation.max_length,
    });

    let display = resolve_display(meta, unwrapped, editor);

    let group = meta.string(keys::FIELD_GROUP).map(|label| GroupHint {
        label,
        collapsible: meta.flag(keys::GROUP_COLLAPSIBLE),
        collapsed: meta.flag(keys::GROUP_COLLAPSED),
    });

    FieldDefinition {
        name: input.name.to_string(),
        label,
        data_type: classified.kind,
        editor,
        sort_order: meta.integer(keys::SORT_ORDER).unwrap_or(DEFAULT_SORT_ORDER),
        field_set: String::new(),
        required: validation.required,
        read_only: !input.editable || explicit_read_only,
        nullable: unwrapped.nullable,
        hidden,
        editable: input.editable,
        is_primary_key: input.primary_key,
        navigation,
        navigation_relation: meta.string(keys::NAVIGATION_RELATION),
        options,
        validation,
        display,
        renderer,
        default_value: meta
            .get(keys::DEFAULT)
            .or(unwrapped.default)
            .cloned(),
        group,
    }
}

pub fn resolve_label(meta: &MetadataBag, name: &str) -> String {
    meta.string(keys::LABEL)
        .unwrap_or_else(|| format_label(name))
}

// ---------------------------------------------------------------------------
// Editor kind
// ---------------------------------------------------------------------------

struct EditorInputs<'a> {
    name: &'a str,
    meta: &'a MetadataBag,
    classified: &'a Classified<'a>,
    editable: bool,
    explicit_read_only: bool,
    has_options: bool,
    navigation: Option<&'a NavigationBinding>,
    renderer: Option<&'a CustomRenderer>,
    max_length: Option<u64>,
}

fn resolve_editor(inputs: EditorInputs<'_>) -> EditorKind {
    let multiple = inputs.meta.flag(keys::MULTIPLE);

    if let Some(renderer) = inputs.renderer {
        return RENDERER_CATALOG
            .get(renderer.name.as_str())
            .copied()
            .unwrap_or(EditorKind::Custom);
    }
    if let Some(nav) = inputs.navigation {
        return if nav.multiple {
            EditorKind::Multilookup
        } else {
            EditorKind::Lookup
        };
    }
    if inputs.has_options {
        return if multiple || inputs.classified.kind == DataKind::Array {
            EditorKind::Multiselect
        } else {
            EditorKind::Select
        };
    }
    if !inputs.editable || inputs.explicit_read_only {
        return EditorKind::Readonly;
    }
    let format = inputs.meta.str(keys::FORMAT).or_else(|| {
        inputs
            .classified
            .string_checks
            .and_then(|checks| checks.format.as_deref())
    });
    if let Some(kind) = format.and_then(editor_for_format) {
        return kind;
    }

    match inputs.classified.kind {
        DataKind::String => match inputs.max_length {
            Some(max) if max > LONG_TEXT_THRESHOLD => EditorKind::Textarea,
            _ => EditorKind::Text,
        },
        DataKind::Number => {
            if inputs.meta.flag(keys::CURRENCY) || suggests_currency(inputs.name) {
                EditorKind::Currency
            } else {
                EditorKind::Number
            }
        }
        DataKind::Integer => EditorKind::Integer,
        DataKind::Boolean => EditorKind::Boolean,
        DataKind::Date => EditorKind::Date,
        DataKind::Datetime => EditorKind::Datetime,
        DataKind::Array => match inputs.classified.item_kind() {
            Some(DataKind::String) => EditorKind::Chips,
            _ => EditorKind::Custom,
        },
        DataKind::Object => EditorKind::Custom,
        DataKind::Null | DataKind::Any => EditorKind::Text,
    }
}

fn editor_for_format(format: &str) -> Option<EditorKind> {
    match format.to_ascii_lowercase().as_str() {
        "date-time" | "datetime" => Some(EditorKind::Datetime),
        "date" => Some(EditorKind::Date),
        "time" => Some(EditorKind::Time),
        "email" => Some(EditorKind::Email),
        "phone" | "tel" => Some(EditorKind::Phone),
        "url" | "uri" => Some(EditorKind::Url),
        "password" => Some(EditorKind::Password),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Navigation, options, renderer
// ---------------------------------------------------------------------------

fn resolve_navigation(meta: &MetadataBag) -> Option<NavigationBinding> {
    meta.string(keys::NAVIGATION_TARGET)
        .map(|target| navigation_binding(meta, target))
}

pub(crate) fn navigation_binding(meta: &MetadataBag, target: String) -> NavigationBinding {
    NavigationBinding {
        target,
        multiple: meta.flag(keys::MULTIPLE),
        display_field: meta.string(keys::NAVIGATION_DISPLAY_FIELD),
        value_field: meta.string(keys::NAVIGATION_VALUE_FIELD),
        foreign_key: None,
    }
}

fn resolve_options(meta: &MetadataBag, classified: &Classified<'_>) -> Option<Vec<FieldOption>> {
    if let Some(Value::Array(raw)) = meta.get(keys::OPTIONS) {
        let options: Vec<FieldOption> = raw.iter().filter_map(option_from_value).collect();
        if !options.is_empty() {
            return Some(options);
        }
    }
    classified.enum_values.filter(|v| !v.is_empty()).map(|values| {
        values
            .iter()
            .map(|v| FieldOption {
                label: v.clone(),
                value: Value::String(v.clone()),
            })
            .collect()
    })
}

fn option_from_value(value: &Value) -> Option<FieldOption> {
    match value {
        Value::String(s) => Some(FieldOption {
            label: s.clone(),
            value: value.clone(),
        }),
        Value::Number(n) => Some(FieldOption {
            label: n.to_string(),
            value: value.clone(),
        }),
        Value::Object(map) => {
            let value = map.get("value")?.clone();
            let label = map
                .get("label")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| match &value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                });
            Some(FieldOption { label, value })
        }
        _ => None,
    }
}

fn resolve_renderer(meta: &MetadataBag) -> Option<CustomRenderer> {
    meta.string(keys::CUSTOM_RENDERER).map(|name| CustomRenderer {
        name,
        props: meta.object(keys::RENDERER_PROPS).cloned().unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// Validation and display
// ---------------------------------------------------------------------------

fn resolve_validation(
    input: FieldInput<'_>,
    unwrapped: &Unwrapped<'_>,
    classified: &Classified<'_>,
    hidden: bool,
) -> ValidationRules {
    let meta = &unwrapped.meta;
    let checks = classified.string_checks;

    ValidationRules {
        required: !unwrapped.optional
            && !unwrapped.nullable
            && input.editable
            && !input.primary_key
            && !hidden,
        min: meta.number(keys::MIN).or(classified.bounds.0),
        max: meta.number(keys::MAX).or(classified.bounds.1),
        min_length: meta
            .unsigned(keys::MIN_LENGTH)
            .or_else(|| checks.and_then(|c| c.min_length)),
        max_length: meta
            .unsigned(keys::MAX_LENGTH)
            .or_else(|| checks.and_then(|c| c.max_length)),
        pattern: meta
            .string(keys::PATTERN)
            .or_else(|| checks.and_then(|c| c.pattern.clone())),
        message: meta.string(keys::VALIDATION_MESSAGE),
    }
}

fn resolve_display(meta: &MetadataBag, unwrapped: &Unwrapped<'_>, editor: EditorKind) -> DisplayHints {
    let col_span = meta
        .unsigned(keys::COL_SPAN)
        .and_then(|n| u8::try_from(n).ok())
        .or_else(|| editor.is_long_text().then_some(FULL_WIDTH_COL_SPAN));

    DisplayHints {
        col_span,
        placeholder: meta.string(keys::PLACEHOLDER),
        help_text: meta
            .string(keys::HELP_TEXT)
            .or_else(|| unwrapped.description.map(String::from)),
        tooltip: meta.string(keys::TOOLTIP),
        icon: meta.string(keys::ICON),
        date_format: meta.string(keys::DATE_FORMAT),
        true_label: meta.string(keys::TRUE_LABEL),
        false_label: meta.string(keys::FALSE_LABEL),
        true_severity: meta.string(keys::TRUE_SEVERITY),
        false_severity: meta.string(keys::FALSE_SEVERITY),
        currency: meta.string(keys::CURRENCY_CODE),
        locale: meta.string(keys::LOCALE),
        min_fraction_digits: meta
            .unsigned(keys::MIN_FRACTION_DIGITS)
            .and_then(|n| u8::try_from(n).ok()),
        max_fraction_digits: meta
            .unsigned(keys::MAX_FRACTION_DIGITS)
            .and_then(|n| u8::try_from(n).ok()),
    }
}
