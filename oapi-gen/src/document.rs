//! OpenAPI document assembly.
//!
//! Wraps a finalized [`SchemaRegistry`] as the `components.schemas` section
//! of a full document.

use serde::Serialize;

use crate::registry::SchemaRegistry;

/// OpenAPI version written when none is configured.
pub const DEFAULT_OPENAPI_VERSION: &str = "3.1.0";

/// Default `info.title`.
pub const DEFAULT_TITLE: &str = "API";

/// Default `info.version`.
pub const DEFAULT_API_VERSION: &str = "1.0.0";

/// Default server URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// `openapi` field.
    pub openapi: String,

    /// `info.title`.
    pub title: String,

    /// `info.version`.
    pub version: String,

    /// `info.description`.
    pub description: Option<String>,

    /// `info.contact`.
    pub contact: Option<Contact>,

    /// `servers`.
    pub servers: Vec<Server>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            openapi: DEFAULT_OPENAPI_VERSION.to_string(),
            title: DEFAULT_TITLE.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            description: None,
            contact: None,
            servers: vec![Server::new(DEFAULT_SERVER_URL)],
        }
    }
}

impl DocumentInfo {
    /// Create document metadata with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the API version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the contact.
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Replace the server list.
    pub fn with_servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = servers;
        self
    }
}

/// `info.contact` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Contact {
    /// Check if no contact field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.url.is_none()
    }
}

/// Entry of the `servers` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }
}

/// `info` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,

    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

/// `components` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Components {
    pub schemas: SchemaRegistry,
}

/// A complete OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenApiDocument {
    pub openapi: String,

    pub info: Info,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    pub components: Components,
}

impl OpenApiDocument {
    /// Assemble a document from metadata and a finalized registry.
    pub fn new(info: DocumentInfo, schemas: SchemaRegistry) -> Self {
        Self {
            openapi: info.openapi,
            info: Info {
                title: info.title,
                version: info.version,
                description: info.description,
                contact: info.contact.filter(|contact| !contact.is_empty()),
            },
            servers: info.servers,
            components: Components { schemas },
        }
    }

    /// The schema section.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.components.schemas
    }
}
