use serde::Serialize;

/// Handle to a building element. Material associations and property groups
/// are owned by the [`ObjectGraph`](super::ObjectGraph), not by the handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub id: u64,
    pub global_id: String,
    pub name: Option<String>,
    /// IFC entity name, e.g. `IFCWALL` or `IFCSLAB`.
    pub entity_type: String,
    pub type_id: Option<u64>,
}

impl Element {
    #[must_use]
    pub fn new(id: u64, entity_type: impl Into<String>) -> Self {
        Self {
            id,
            global_id: String::new(),
            name: None,
            entity_type: entity_type.into(),
            type_id: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_global_id(mut self, global_id: impl Into<String>) -> Self {
        self.global_id = global_id.into();
        self
    }

    /// Display label: the element name, else a GlobalId prefix, else type and id.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        if !self.global_id.is_empty() {
            let prefix: String = self.global_id.chars().take(8).collect();
            return format!("Element_{prefix}");
        }
        format!("{} #{}", self.entity_type, self.id)
    }
}
