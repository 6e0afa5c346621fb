//! Request and response envelopes.

use serde::{Deserialize, Serialize};
use soap_model::Value;

use crate::bag::PropertyBag;
use crate::transport::Fault;

/// Wire operation name: a service namespace plus the `prefix_method` name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationName {
    pub namespace: String,
    pub name: String,
}

impl OperationName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// Value of one marshaled wire property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireValue {
    /// Plain textual content (reference strings).
    Text(String),
    /// Explicitly typed primitive: namespace + type name + string content.
    Typed {
        namespace: String,
        type_name: String,
        text: String,
    },
    /// Value handed to the wire library as-is (plain primitives and opaquely
    /// passed composites).
    Raw(Value),
}

impl WireValue {
    /// Textual content regardless of variant.
    pub fn text(&self) -> String {
        match self {
            WireValue::Text(s) => s.clone(),
            WireValue::Typed { text, .. } => text.clone(),
            WireValue::Raw(value) => value.wire_text(),
        }
    }
}

/// One named request property. Repeated-property semantics: a collection
/// argument contributes one property per element under the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireProperty {
    pub name: String,
    pub value: WireValue,
}

/// Outbound request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub operation: OperationName,
    /// Property carrying the entity reference string, if the method targets
    /// an instance.
    pub this_ref: Option<(String, String)>,
    pub properties: Vec<WireProperty>,
}

impl RequestEnvelope {
    pub fn new(operation: OperationName) -> Self {
        Self {
            operation,
            this_ref: None,
            properties: Vec::new(),
        }
    }

    pub fn set_this(&mut self, property: impl Into<String>, id_ref: impl Into<String>) {
        self.this_ref = Some((property.into(), id_ref.into()));
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: WireValue) {
        self.properties.push(WireProperty {
            name: name.into(),
            value,
        });
    }

    /// All properties under `name`, in emission order.
    pub fn properties_named(&self, name: &str) -> Vec<&WireProperty> {
        self.properties.iter().filter(|p| p.name == name).collect()
    }
}

/// Decoded body of a structurally successful transport response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseBody {
    /// Protocol-level fault signaled by the remote side.
    Fault(Fault),
    /// Decoded return content.
    Bag(PropertyBag),
}

/// Inbound response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    pub fn bag(bag: PropertyBag) -> Self {
        Self {
            body: ResponseBody::Bag(bag),
        }
    }

    pub fn fault(fault: Fault) -> Self {
        Self {
            body: ResponseBody::Fault(fault),
        }
    }
}
