use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Closed set of data kinds a schema node classifies into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    Datetime,
    Array,
    Object,
    Null,
    #[default]
    Any,
}

/// Editor kind a presentation layer should use for a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    #[default]
    Text,
    Textarea,
    Number,
    Currency,
    Integer,
    Boolean,
    Date,
    Datetime,
    Time,
    Email,
    Phone,
    Url,
    Password,
    Select,
    Multiselect,
    Lookup,
    Multilookup,
    Combobox,
    Chips,
    Readonly,
    RichText,
    Markdown,
    Code,
    Json,
    Color,
    Rating,
    Slider,
    Toggle,
    File,
    Image,
    Custom,
}

impl EditorKind {
    /// Editors that want the full form width.
    pub fn is_long_text(self) -> bool {
        matches!(
            self,
            EditorKind::Textarea
                | EditorKind::RichText
                | EditorKind::Markdown
                | EditorKind::Code
                | EditorKind::Json
        )
    }
}

// ---------------------------------------------------------------------------
// Field definition parts
// ---------------------------------------------------------------------------

/// Binding of a foreign-key (or linked display) field to another model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationBinding {
    pub target: String,
    pub multiple: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_field: Option<String>,
    /// Sibling foreign-key field a display field writes through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_fraction_digits: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fraction_digits: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRenderer {
    pub name: String,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub props: serde_json::Map<String, serde_json::Value>,
}

/// Grouping request carried by a field until fieldsets are assembled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupHint {
    pub label: String,
    pub collapsible: bool,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub data_type: DataKind,
    pub editor: EditorKind,
    pub sort_order: i64,
    #[serde(rename = "fieldSet")]
    pub field_set: String,
    pub required: bool,
    pub read_only: bool,
    pub nullable: bool,
    pub hidden: bool,
    pub editable: bool,
    pub is_primary_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    pub validation: ValidationRules,
    pub display: DisplayHints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<CustomRenderer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Consumed by the fieldset grouper; `None` means the default group.
    #[serde(skip)]
    pub group: Option<GroupHint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsetDefinition {
    pub id: String,
    pub label: String,
    pub sort_order: i64,
    pub collapsible: bool,
    pub collapsed: bool,
    pub fields: Vec<String>,
}

// ---------------------------------------------------------------------------
// Entity metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl AuditFields {
    pub fn is_empty(&self) -> bool {
        self.created_on.is_none()
            && self.created_by.is_none()
            && self.updated_on.is_none()
            && self.updated_by.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub model: String,
    pub save_model: String,
    pub label: String,
    pub plural_label: String,
    pub primary_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_path: Option<String>,
    pub read_only: bool,
    pub creatable: bool,
    pub deletable: bool,
    pub selectable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_delete_field: Option<String>,
}

// ---------------------------------------------------------------------------
// Compiled configuration (top-level output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledConfig {
    pub version: String,
    pub entity: EntityMetadata,
    pub field_sets: Vec<FieldsetDefinition>,
    pub fields: BTreeMap<String, FieldDefinition>,
    pub field_order: Vec<String>,
    pub editable_fields: Vec<String>,
    pub required_fields: Vec<String>,
    pub default_values: BTreeMap<String, serde_json::Value>,
}

impl CompiledConfig {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn fieldset(&self, id: &str) -> Option<&FieldsetDefinition> {
        self.field_sets.iter().find(|fs| fs.id == id)
    }
}

/// Caller-supplied overrides for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_path: Option<String>,
}

impl CompileOptions {
    /// Fill unset values from `fallback`, keeping values already set.
    pub fn or(mut self, fallback: &CompileOptions) -> Self {
        self.write_model_id = self.write_model_id.or_else(|| fallback.write_model_id.clone());
        self.label = self.label.or_else(|| fallback.label.clone());
        self.plural_label = self.plural_label.or_else(|| fallback.plural_label.clone());
        self.primary_key_field = self
            .primary_key_field
            .or_else(|| fallback.primary_key_field.clone());
        self.route_path = self.route_path.or_else(|| fallback.route_path.clone());
        self.list_path = self.list_path.or_else(|| fallback.list_path.clone());
        self
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: DiagnosticSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}
