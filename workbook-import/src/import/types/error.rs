//! Import error taxonomy

/// Error raised while importing a workbook
#[derive(Debug)]
pub enum ImportError {
    /// A required call parameter is missing or empty
    Argument { message: String },
    /// A control sheet is missing from its fixed position
    SheetOrder {
        expected: &'static str,
        position: usize,
        found: Option<String>,
    },
    /// The lookup does not know the type
    TypeNotFound { type_name: String },
    /// The type exists but declares no property list
    Schema { type_name: String },
    /// A required property has neither a value nor an id/alias override
    Validation {
        property: String,
        row: String,
        id_column: Option<String>,
        alias_column: Option<String>,
    },
    /// A lookup call failed
    Lookup {
        operation: &'static str,
        source: anyhow::Error,
    },
    /// The workbook data could not be decoded
    Spreadsheet { source: anyhow::Error },
}

/// Result alias for import operations
pub type ImportResult<T> = std::result::Result<T, ImportError>;

impl ImportError {
    pub fn argument(message: impl Into<String>) -> Self {
        ImportError::Argument {
            message: message.into(),
        }
    }

    pub fn lookup(operation: &'static str, source: anyhow::Error) -> Self {
        ImportError::Lookup { operation, source }
    }

    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::Argument { .. } => "argument",
            ImportError::SheetOrder { .. } => "sheet_order",
            ImportError::TypeNotFound { .. } => "type_not_found",
            ImportError::Schema { .. } => "schema",
            ImportError::Validation { .. } => "validation",
            ImportError::Lookup { .. } => "lookup",
            ImportError::Spreadsheet { .. } => "spreadsheet",
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Argument { message } => write!(f, "Invalid parameters: {}", message),
            ImportError::SheetOrder {
                expected,
                position,
                found,
            } => write!(
                f,
                "{} must be sheet {} of the workbook, was {}",
                expected,
                position + 1,
                found.as_deref().unwrap_or("(missing)")
            ),
            ImportError::TypeNotFound { type_name } => {
                write!(f, "Type [{}] does not exist", type_name)
            }
            ImportError::Schema { type_name } => {
                write!(f, "Type [{}] does not have properties", type_name)
            }
            ImportError::Validation {
                property,
                row,
                id_column,
                alias_column,
            } => {
                write!(f, "Missing required property [{}] on row {}", property, row)?;
                if let (Some(id), Some(alias)) = (id_column, alias_column) {
                    write!(
                        f,
                        " and [id] is missing: {} or [alias] is missing: {}",
                        id, alias
                    )?;
                }
                Ok(())
            }
            ImportError::Lookup { operation, source } => {
                write!(f, "Lookup {} failed: {:#}", operation, source)
            }
            ImportError::Spreadsheet { source } => {
                write!(f, "Failed to read workbook: {:#}", source)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Lookup { source, .. } | ImportError::Spreadsheet { source } => {
                Some(&**source)
            }
            _ => None,
        }
    }
}
