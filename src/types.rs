use std::collections::HashMap;
use std::fmt;
use std::mem;

/// A value type of the language.
///
/// `None` and `Invalid` are sentinels: `None` marks a declaration whose type
/// is still to be taken from its initializer, `Invalid` marks a declaration
/// whose type could not be determined. `User` is a type name the type table
/// does not know about and never survives semantic analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    None,
    Invalid,
    Uint64,
    Int64,
    Float64,
    String,
    Void,
    User(String),
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::None => "none",
            Type::Invalid => "invalid",
            Type::Uint64 => "uint64",
            Type::Int64 => "int64",
            Type::Float64 => "float64",
            Type::String => "string",
            Type::Void => "void",
            Type::User(name) => name,
        }
    }

    /// Tag equality. There is no widening, coercion or subtyping, and a
    /// `User` type never matches anything.
    pub fn same_tag(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::User(_), _) | (_, Type::User(_)) => false,
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Type::User(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps type names written in source to [`Type`] values.
#[derive(Debug, Clone)]
pub struct TypeTable {
    types: HashMap<String, Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        let types = [Type::Uint64, Type::Int64, Type::Float64, Type::String, Type::Void]
            .into_iter()
            .map(|ty| (ty.name().to_string(), ty))
            .collect();
        TypeTable { types }
    }

    /// Unknown names come back as `Type::User(name)`; rejecting them is left
    /// to semantic analysis.
    pub fn lookup(&self, name: &str) -> Type {
        self.types
            .get(name)
            .cloned()
            .unwrap_or_else(|| Type::User(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        TypeTable::new()
    }
}

/// State shared by every stage of one compilation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub types: TypeTable,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn get_type(&self, name: &str) -> Type {
        self.types.lookup(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builtin_type_names() {
        let context = Context::new();
        assert_eq!(context.get_type("int64"), Type::Int64);
        assert_eq!(context.get_type("uint64"), Type::Uint64);
        assert_eq!(context.get_type("float64"), Type::Float64);
        assert_eq!(context.get_type("string"), Type::String);
        assert_eq!(context.get_type("void"), Type::Void);
    }

    #[test]
    fn test_unknown_name_is_user_type() {
        let context = Context::new();
        let ty = context.get_type("Point");
        assert_eq!(ty, Type::User("Point".to_string()));
        assert!(ty.is_user());
        assert_eq!(ty.to_string(), "Point");
        assert!(!context.types.contains("Point"));
    }

    #[test]
    fn test_tag_equality() {
        assert!(Type::Int64.same_tag(&Type::Int64));
        assert!(!Type::Int64.same_tag(&Type::Uint64));
        assert!(!Type::Int64.same_tag(&Type::Float64));
        assert!(!Type::User("a".into()).same_tag(&Type::User("a".into())));
    }
}
