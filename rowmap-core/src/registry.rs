use crate::{
    Column, Error, Field, FieldKind, Options, Record, RecordType, Result, Roles, Struct,
    StructId, Table, TableId, parse_options,
};
use std::{
    any::TypeId,
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock},
};

/// Cache of the schema derived from record types.
///
/// Lookups take a read lock. The first resolution of a type builds it, with every
/// related type it reaches, under the write lock; the result is committed only when the
/// whole build succeeds. Entries are never evicted.
#[derive(Default, Debug)]
pub struct Registry {
    state: RwLock<State>,
}

#[derive(Default, Clone, Debug)]
struct State {
    structs: Vec<Arc<Struct>>,
    struct_ids: HashMap<TypeId, StructId>,
    tables: Vec<Arc<Table>>,
    table_ids: HashMap<TypeId, TableId>,
}

impl Registry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Table of `T`, built on first use.
    pub fn table<T: Record>(&self) -> Result<Arc<Table>> {
        self.table_of(T::describe())
    }

    pub fn table_of(&self, record_type: &'static RecordType) -> Result<Arc<Table>> {
        let type_id = (record_type.type_id)();
        {
            let state = self.state.read().map_err(|_| Error::msg("poisoned registry"))?;
            if let Some(id) = state.table_ids.get(&type_id) {
                return Ok(state.tables[*id].clone());
            }
        }
        let mut state = self
            .state
            .write()
            .map_err(|_| Error::msg("poisoned registry"))?;
        if let Some(id) = state.table_ids.get(&type_id) {
            return Ok(state.tables[*id].clone());
        }
        let mut staged = state.clone();
        let id = staged.build_table(record_type)?;
        log::trace!(
            "Resolved table {} with {} related tables",
            staged.tables[id].name,
            staged.tables.len() - state.tables.len() - 1
        );
        *state = staged;
        Ok(state.tables[id].clone())
    }

    /// Table previously built, referenced by a relation column.
    pub fn table_at(&self, id: TableId) -> Option<Arc<Table>> {
        self.state.read().ok()?.tables.get(id).cloned()
    }

    /// Struct of `T`, built on first use.
    pub fn structure<T: Record>(&self) -> Result<Arc<Struct>> {
        let record_type = T::describe();
        let type_id = (record_type.type_id)();
        {
            let state = self.state.read().map_err(|_| Error::msg("poisoned registry"))?;
            if let Some(id) = state.struct_ids.get(&type_id) {
                return Ok(state.structs[*id].clone());
            }
        }
        let mut state = self
            .state
            .write()
            .map_err(|_| Error::msg("poisoned registry"))?;
        let mut staged = state.clone();
        let id = staged.build_struct(record_type)?;
        *state = staged;
        Ok(state.structs[id].clone())
    }
}

impl State {
    fn build_struct(&mut self, record_type: &'static RecordType) -> Result<StructId> {
        let type_id = (record_type.type_id)();
        if let Some(id) = self.struct_ids.get(&type_id) {
            return Ok(*id);
        }
        let id = self.structs.len();
        self.struct_ids.insert(type_id, id);
        self.structs.push(Arc::new(Struct {
            id,
            type_id,
            record_type,
            fields: Vec::new(),
        }));
        let mut fields = Vec::with_capacity(record_type.fields.len());
        for (i, def) in record_type.fields.iter().enumerate() {
            if def.tag == "-" {
                continue;
            }
            let tag = parse_options(&def.kind, def.tag).map_err(|e| {
                Error::msg(format!(
                    "struct {} field:{} {}: {e}",
                    record_type.name,
                    i + 1,
                    def.name
                ))
            })?;
            let mut field = Field {
                name: def.name,
                alias: tag.alias,
                index: i,
                options: tag.options,
                size: tag.size,
                kind: def.kind,
                belong: id,
                own: None,
            };
            if field.is_inline() || field.is_one() || field.is_many() {
                if let Some(target) = def.kind.target() {
                    field.own = Some(self.build_struct(target)?);
                }
            } else if let FieldKind::Record { .. } | FieldKind::Many { .. } = def.kind {
                return Err(Error::msg(format!(
                    "struct {} field:{} {}: nested record without inline or relation option",
                    record_type.name,
                    i + 1,
                    def.name
                )));
            }
            fields.push(Arc::new(field));
        }
        self.structs[id] = Arc::new(Struct {
            id,
            type_id,
            record_type,
            fields,
        });
        Ok(id)
    }

    fn build_table(&mut self, record_type: &'static RecordType) -> Result<TableId> {
        let root = self.build_struct(record_type)?;
        let first = self.tables.len();
        let mut pending = Vec::new();
        let id = self.layout(root, &mut pending)?;
        let mut tables: Vec<Table> = pending;
        self.splice(first, &mut tables)?;
        self.check_map_keys(first, &tables)?;
        tables.iter_mut().for_each(Self::cache_flags);
        // Ids were reserved in order, `tables[i]` has id `first + i`.
        self.tables.extend(tables.into_iter().map(Arc::new));
        Ok(id)
    }

    /// Flattens the columns of a struct and of every table it relates to, assigning
    /// roles and names of the local columns.
    fn layout(&mut self, root: StructId, pending: &mut Vec<Table>) -> Result<TableId> {
        let structure = self.structs[root].clone();
        if let Some(id) = self.table_ids.get(&structure.type_id) {
            return Ok(*id);
        }
        let id = self.tables.len() + pending.len();
        self.table_ids.insert(structure.type_id, id);
        let name = structure.record_type.table.to_string();
        let mut columns = Vec::with_capacity(structure.fields.len());
        for field in &structure.fields {
            if !field.is_inline() {
                columns.push(Column::new(&name, columns.len(), vec![field.clone()]));
                continue;
            }
            self.flatten(&name, &structure, field, &mut columns)?;
        }
        let mut table = Table {
            id,
            name,
            record_type: structure.record_type,
            columns,
            names: HashMap::new(),
            roles: Roles::default(),
        };
        Self::assign_roles(&mut table)?;
        pending.push(table);
        let position = pending.len() - 1;
        let targets: Vec<(usize, StructId)> = pending[position]
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.last().is_one() || c.last().is_many())
            .filter_map(|(i, c)| c.last().own.map(|own| (i, own)))
            .collect();
        for (column, own) in targets {
            let related = self.layout(own, pending)?;
            pending[position].columns[column].related = Some(related);
        }
        Ok(id)
    }

    /// Depth first expansion of an inline field into one column per terminal field.
    fn flatten(
        &self,
        table: &str,
        root: &Struct,
        field: &Arc<Field>,
        columns: &mut Vec<Column>,
    ) -> Result<()> {
        let mut chain = vec![field.clone()];
        let mut stack: Vec<(StructId, usize)> = vec![(Self::own(field)?, 0)];
        while let Some((structure, position)) = stack.pop() {
            let fields = &self.structs[structure].fields;
            if position >= fields.len() {
                chain.pop();
                continue;
            }
            stack.push((structure, position + 1));
            let next = &fields[position];
            if next.is_inline() {
                let own = Self::own(next)?;
                if own == root.id || chain.iter().any(|v| v.own == Some(own)) {
                    return Err(Error::msg(format!(
                        "struct {} field:{} {}: inline circle",
                        root.name(),
                        field.index + 1,
                        field.name
                    )));
                }
                chain.push(next.clone());
                stack.push((own, 0));
            } else {
                let mut fields = chain.clone();
                fields.push(next.clone());
                columns.push(Column::new(table, columns.len(), fields));
            }
        }
        Ok(())
    }

    fn own(field: &Field) -> Result<StructId> {
        field
            .own
            .ok_or_else(|| Error::msg(format!("field {} has no nested struct", field.name)))
    }

    /// Singleton roles, local names and the primary key fallback.
    fn assign_roles(table: &mut Table) -> Result<()> {
        for column in &mut table.columns {
            let fixed = column
                .fields
                .iter()
                .any(|v| v.is(Options::INLINE_STATIC));
            let last = column.last().clone();
            if !fixed {
                if last.is(Options::UNIQUE) {
                    column.flags.insert(Options::UNIQUE);
                }
                for role in Roles::ALL {
                    if !last.is(role) {
                        continue;
                    }
                    let slot = table.roles.slot(role);
                    if slot.is_some() {
                        return Err(Error::msg(format!(
                            "table {}: duplicate option {}",
                            table.name,
                            role.name()
                        )));
                    }
                    *slot = Some(column.index);
                }
            }
            if last.is_many() {
                column.name = last.name.to_string();
                continue;
            }
            let mut name: String = column
                .fields
                .iter()
                .filter(|v| v.is_inline() && !v.alias.is_empty())
                .map(|v| v.alias.as_str())
                .collect();
            name.push_str(last.column_name());
            column.name = name;
            if !last.is_one() {
                Self::register_name(table.name.as_str(), &mut table.names, column)?;
            }
        }
        if table.roles.primary_key.is_none() {
            if let Some(i) = table.roles.auto_increment {
                table.roles.primary_key = Some(i);
            } else if let Some(i) = table.names.get("id").copied() {
                table.roles.primary_key = Some(i);
                if table.columns[i].prototype().is_integer() {
                    table.roles.auto_increment = Some(i);
                }
            }
        }
        Ok(())
    }

    fn register_name(
        table: &str,
        names: &mut HashMap<String, usize>,
        column: &Column,
    ) -> Result<()> {
        let key = column.name.to_lowercase();
        if names.contains_key(&key) {
            return Err(Error::msg(format!(
                "table {table}: duplicate column name: {key}"
            )));
        }
        names.insert(key, column.index);
        Ok(())
    }

    fn table<'a>(&'a self, first: TableId, pending: &'a [Table], id: TableId) -> &'a Table {
        if id < first {
            &self.tables[id]
        } else {
            &pending[id - first]
        }
    }

    /// Appends the remote primary key chain to every one relation column.
    fn splice(&self, first: TableId, tables: &mut [Table]) -> Result<()> {
        let mut splices = Vec::new();
        for (t, table) in tables.iter().enumerate() {
            for column in table.columns.iter().filter(|c| c.last().is_one()) {
                let relation = column.last();
                let Some(mut related) = column.related else {
                    continue;
                };
                let mut visited = HashSet::from([related]);
                let mut extension: Vec<Arc<Field>> = Vec::new();
                loop {
                    let remote = self.table(first, tables, related);
                    let Some(pk) = remote.primary_key() else {
                        return Err(Error::msg(format!(
                            "table {} column:{} {}: table {} must have a primary key",
                            table.name,
                            column.first().index + 1,
                            column.first().name,
                            remote.name
                        )));
                    };
                    extension.extend(pk.fields.iter().cloned());
                    if !pk.last().is_one() {
                        break;
                    }
                    let Some(next) = pk.related else {
                        break;
                    };
                    if !visited.insert(next) {
                        let option = [
                            Options::FOREIGN_KEY,
                            Options::MANY_TO_ONE,
                            Options::ONE_TO_ONE,
                        ]
                        .into_iter()
                        .find(|v| relation.is(*v))
                        .map_or("relation", Options::name);
                        return Err(Error::msg(format!(
                            "table {} column:{} {}: {option} circle",
                            table.name,
                            column.first().index + 1,
                            column.first().name
                        )));
                    }
                    related = next;
                }
                let terminal = extension
                    .last()
                    .cloned()
                    .ok_or_else(|| Error::msg("empty primary key chain"))?;
                splices.push((t, column.index, extension, terminal));
            }
        }
        for (t, c, extension, terminal) in splices {
            let table = &mut tables[t];
            let column = &mut table.columns[c];
            if column.last().alias.is_empty() {
                column.name.push('_');
                column.name.push_str(terminal.column_name());
            }
            column.fields.extend(extension);
            let column = &table.columns[c];
            Self::register_name(&table.name, &mut table.names, column)?;
        }
        Ok(())
    }

    /// Many relations stored in maps must be keyed like the remote primary key.
    fn check_map_keys(&self, first: TableId, tables: &[Table]) -> Result<()> {
        for table in tables {
            for column in &table.columns {
                let field = column.last();
                let (FieldKind::Many { key: Some(key), .. }, Some(related)) =
                    (field.kind, column.related)
                else {
                    continue;
                };
                let remote = self.table(first, tables, related);
                if !remote
                    .primary_key()
                    .is_some_and(|pk| pk.prototype().same_type(&key()))
                {
                    return Err(Error::msg(format!(
                        "struct {} field:{} {}: table {} must have the map's key type primary key",
                        self.structs[field.belong].name(),
                        field.index + 1,
                        field.name,
                        remote.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn cache_flags(table: &mut Table) {
        let roles = table.roles;
        for column in &mut table.columns {
            for role in Roles::ALL {
                if roles.get(role) == Some(column.index) {
                    column.flags.insert(role);
                }
            }
            let nullable = column.fields.iter().any(|v| v.is_nullable());
            if nullable {
                column.flags.insert(Options::NULLABLE);
            }
            if !nullable && column.one().unwrap_or(column.last()).is(Options::COLLAPSE) {
                column.flags.insert(Options::COLLAPSE);
            }
            if column.related.is_some() {
                column.flags.insert(if column.last().is_many() {
                    Options::MANY
                } else {
                    Options::ONE
                });
            }
        }
    }
}
