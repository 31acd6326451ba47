use super::kinds::TypeKind;

/// Declaration of one expected parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: TypeKind,
    pub required: bool,
}

const fn required(name: &'static str, kind: TypeKind) -> ParameterSpec {
    ParameterSpec {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: TypeKind) -> ParameterSpec {
    ParameterSpec {
        name,
        kind,
        required: false,
    }
}

/// The parameter table of one protocol variant.
#[derive(Debug)]
pub struct ParameterSchema {
    pub name: &'static str,
    specs: &'static [ParameterSpec],
}

impl ParameterSchema {
    pub const fn new(name: &'static str, specs: &'static [ParameterSpec]) -> Self {
        Self { name, specs }
    }

    pub fn specs(&self) -> &'static [ParameterSpec] {
        self.specs
    }

    pub fn spec(&self, name: &str) -> Option<&'static ParameterSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Names that must be supplied, in declaration order.
    pub fn required_names(&self) -> Vec<&'static str> {
        self.specs
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name)
            .collect()
    }

    /// Names whose absence only deserves a warning.
    pub fn optional_names(&self) -> Vec<&'static str> {
        self.specs
            .iter()
            .filter(|spec| !spec.required)
            .map(|spec| spec.name)
            .collect()
    }
}

const DESKTOP_V1_SPECS: &[ParameterSpec] = &[
    required("FolderOut", TypeKind::FilesystemPath),
    optional("Perimeter", TypeKind::WktPolygon),
    optional("Product", TypeKind::Guid),
    required("OrderLabel", TypeKind::NonEmptyString),
    required("Client", TypeKind::Guid),
    required("Organism", TypeKind::Guid),
    required("Request", TypeKind::PositiveInteger),
    required("Parameters", TypeKind::JsonBlob),
];

const DESKTOP_V2_ARGS_SPECS: &[ParameterSpec] =
    &[required("parametersFile", TypeKind::FilesystemPath)];

const DESKTOP_V2_PROPERTIES_SPECS: &[ParameterSpec] = &[
    required("FolderOut", TypeKind::NonEmptyString),
    required("Parameters", TypeKind::Opaque),
];

const SERVER_V1_QUERY_SPECS: &[ParameterSpec] = &[
    required("Product", TypeKind::NonEmptyString),
    required("FolderOut", TypeKind::NonEmptyString),
];

const SERVER_V2_PROPERTIES_SPECS: &[ParameterSpec] = &[
    required("FolderOut", TypeKind::Opaque),
    required("Parameters", TypeKind::Opaque),
];

/// Legacy FME Desktop flags (`--Name value`).
pub static DESKTOP_V1: ParameterSchema = ParameterSchema::new("fme-desktop-v1", DESKTOP_V1_SPECS);

/// Command-line flags of the parameters-file FME Desktop convention.
pub static DESKTOP_V2_ARGS: ParameterSchema =
    ParameterSchema::new("fme-desktop-v2-args", DESKTOP_V2_ARGS_SPECS);

/// Feature properties read from the FME Desktop parameters file.
pub static DESKTOP_V2_PROPERTIES: ParameterSchema =
    ParameterSchema::new("fme-desktop-v2-properties", DESKTOP_V2_PROPERTIES_SPECS);

/// Query parameters of the FME Server data download service.
pub static SERVER_V1_QUERY: ParameterSchema =
    ParameterSchema::new("fme-server-v1", SERVER_V1_QUERY_SPECS);

/// Feature properties posted to the FME Server V2 data download service.
pub static SERVER_V2_PROPERTIES: ParameterSchema =
    ParameterSchema::new("fme-server-v2", SERVER_V2_PROPERTIES_SPECS);

/// Query parameters logged on FME Server V1 requests.
pub const SERVER_V1_LOGGED: &[&str] = &[
    "Product",
    "Perimeter",
    "FolderOut",
    "Parameters",
    "OrderLabel",
    "Request",
    "Client",
    "Organism",
];

/// Feature properties logged on FME Server V2 requests.
pub const SERVER_V2_LOGGED: &[&str] = &[
    "FolderOut",
    "OrderGuid",
    "OrderLabel",
    "Client",
    "ClientName",
    "Organism",
    "OrganismName",
    "Product",
    "ProductLabel",
    "Parameters",
    "id",
];
