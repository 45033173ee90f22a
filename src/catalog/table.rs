//! A registered table: name, schema, and the page range it owns.

use crate::catalog::schema::TableSchema;
use crate::storage::PageNum;

pub struct Table {
    pub schema: TableSchema,
    pub first_page: PageNum,
}

impl Table {
    pub fn new(schema: TableSchema, first_page: PageNum) -> Self {
        Table { schema, first_page }
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }
}
