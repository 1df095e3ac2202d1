use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::types::SqlType;

/// Table

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableName {
    /// table name
    pub name: String,
    /// table of schema
    pub schema: Option<String>,
    /// table alias
    pub alias: Option<String>,
}

impl Hash for TableName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.hash(state);
        self.name.hash(state);
    }
}

impl TableName {
    /// create table with name
    pub fn from(arg: &str) -> Self {
        if arg.contains('.') {
            let splinters = arg.split('.').collect::<Vec<&str>>();
            assert!(splinters.len() == 2, "There should only be 2 parts");
            let schema = splinters[0].to_owned();
            let table = splinters[1].to_owned();
            TableName {
                schema: Some(schema),
                name: table,
                alias: None,
            }
        } else {
            TableName {
                schema: None,
                name: arg.to_owned(),
                alias: None,
            }
        }
    }

    pub fn name(&self) -> String {
        self.name.to_owned()
    }

    /// return the long name of the table using schema.table_name
    pub fn complete_name(&self) -> String {
        match self.schema {
            Some(ref schema) => format!("{}.{}", schema, self.name),
            None => self.name.to_owned(),
        }
    }

    pub fn equals_ignore_alias(&self, other: &TableName) -> bool {
        self.name == other.name && self.schema == other.schema
    }
}

/// Column descriptor supplied by a schema introspector.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: SqlType,
    pub not_null: bool,
    /// auto-increment / identity column
    pub identity: bool,
    pub comment: Option<String>,
}

impl ColumnDef {
    pub fn new(name: &str, sql_type: SqlType) -> Self {
        Self {
            name: name.to_owned(),
            sql_type,
            not_null: false,
            identity: false,
            comment: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }
}

/// The schema-side descriptor of one physical table. Fed to the metadata
/// registry at construction time only; the engine never introspects live
/// schemas itself.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TableDef {
    pub name: TableName,

    /// comment of this table
    pub comment: Option<String>,

    /// columns of this table
    pub columns: Vec<ColumnDef>,

    /// views can also be described
    pub is_view: bool,

    pub table_key: Vec<TableKey>,
}

impl TableDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: TableName::from(name),
            comment: None,
            columns: Vec::new(),
            is_view: false,
            table_key: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_key(mut self, key: TableKey) -> Self {
        self.table_key.push(key);
        self
    }

    pub fn name(&self) -> String {
        self.name.name()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.to_owned()).collect()
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Key {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

impl Key {
    pub fn of(columns: &[&str]) -> Self {
        Self {
            name: None,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum TableKey {
    PrimaryKey(Key),
    UniqueKey(Key),
    Key(Key),
}

impl TableKey {
    pub fn is_pri(&self) -> bool {
        matches!(self, TableKey::PrimaryKey(_))
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, TableKey::UniqueKey(_))
    }

    pub fn key(&self) -> &Key {
        match self {
            TableKey::PrimaryKey(k) | TableKey::UniqueKey(k) | TableKey::Key(k) => k,
        }
    }
}

/// Field

/// One declared field of an entity. The declarative replacement for
/// reflection-driven field discovery: name, type tag, the optional payload
/// alias (the field's declared JSON name when it differs from the field
/// name itself) and the primary-key marker.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EntityField {
    pub name: String,
    pub sql_type: SqlType,
    /// declared JSON/payload name, when it differs from `name`
    pub alias: Option<String>,
    /// declared primary key on the entity side
    pub id: bool,
}

impl EntityField {
    pub fn new(name: &str, sql_type: SqlType) -> Self {
        Self {
            name: name.to_owned(),
            sql_type,
            alias: None,
            id: false,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_owned());
        self
    }

    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn name(&self) -> String {
        self.name.to_owned()
    }
}

/// The declarative descriptor of one entity type: its logical name, the
/// table backing it and its field list in declaration order.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    pub entity: String,
    pub table: String,
    pub fields: Vec<EntityField>,
}

impl EntityDef {
    pub fn new(entity: &str, table: &str) -> Self {
        Self {
            entity: entity.to_owned(),
            table: table.to_owned(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: EntityField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&EntityField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_split() {
        let plain = TableName::from("t_employee");
        assert_eq!(plain.name(), "t_employee");
        assert_eq!(plain.complete_name(), "t_employee");

        let qualified = TableName::from("hr.t_employee");
        assert_eq!(qualified.schema.as_deref(), Some("hr"));
        assert_eq!(qualified.complete_name(), "hr.t_employee");
    }

    #[test]
    fn test_table_def_builders() {
        let table = TableDef::new("t_dept")
            .with_column(ColumnDef::new("id", SqlType::Bigint).identity().not_null())
            .with_column(ColumnDef::new("dept_name", SqlType::Varchar))
            .with_key(TableKey::PrimaryKey(Key::of(&["id"])));
        assert_eq!(table.column_names(), vec!["id", "dept_name"]);
        assert!(table.table_key[0].is_pri());
    }
}
