//! Host class definitions.

/// Method visibility as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    /// Only reachable through the `send_*` dispatch methods.
    Private,
}

/// A method exposed on a host class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDef {
    pub name: &'static str,
    pub visibility: Visibility,
    pub arity: usize,
}

impl MethodDef {
    const fn public(name: &'static str, arity: usize) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            arity,
        }
    }

    const fn private(name: &'static str, arity: usize) -> Self {
        Self {
            name,
            visibility: Visibility::Private,
            arity,
        }
    }
}

/// A class registered with the host.
#[derive(Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Name under the module, e.g. `Column`.
    pub name: &'static str,
    /// Fully qualified name, e.g. `DuckDB::Column`.
    pub qualified_name: &'static str,
    /// Name of the wrapped native data type.
    pub data_type: &'static str,
    pub methods: &'static [MethodDef],
}

impl ClassDef {
    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Option<&'static MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Names of public methods.
    pub fn public_methods(&self) -> impl Iterator<Item = &'static str> {
        self.methods
            .iter()
            .filter(|m| m.visibility == Visibility::Public)
            .map(|m| m.name)
    }
}

pub static COLUMN_CLASS: ClassDef = ClassDef {
    name: "Column",
    qualified_name: "DuckDB::Column",
    data_type: "DuckDB/Column",
    methods: &[
        MethodDef::private("_type", 0),
        MethodDef::private("_logical_type", 0),
        MethodDef::public("type", 0),
        MethodDef::public("logical_type", 0),
        MethodDef::public("name", 0),
    ],
};

pub static LOGICAL_TYPE_CLASS: ClassDef = ClassDef {
    name: "LogicalType",
    qualified_name: "DuckDB::LogicalType",
    data_type: "DuckDB/LogicalType",
    methods: &[
        MethodDef::private("_type", 0),
        MethodDef::public("type", 0),
        MethodDef::public("width", 0),
        MethodDef::public("scale", 0),
        MethodDef::public("child_type", 0),
        MethodDef::public("size", 0),
        MethodDef::public("key_type", 0),
        MethodDef::public("value_type", 0),
        MethodDef::public("child_count", 0),
        MethodDef::public("child_name_at", 1),
        MethodDef::public("child_type_at", 1),
        MethodDef::public("each_child_name", 0),
        MethodDef::public("each_child_type", 0),
        MethodDef::public("member_count", 0),
        MethodDef::public("member_name_at", 1),
        MethodDef::public("member_type_at", 1),
        MethodDef::public("each_member_name", 0),
        MethodDef::public("each_member_type", 0),
        MethodDef::public("to_s", 0),
    ],
};
