use crate::ValueWrap;
use mysql_async::FromRowError;

pub(crate) struct RowWrap(pub(crate) rowmap_core::RowLabeled);

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let names: rowmap_core::RowNames = row
            .columns()
            .iter()
            .map(|v| v.name_str().into_owned())
            .collect();
        let mut values = Vec::with_capacity(row.len());
        for i in 0..row.len() {
            match row.take_opt::<ValueWrap, _>(i) {
                Some(Ok(v)) => values.push(v.0),
                _ => return Err(FromRowError(row)),
            }
        }
        Ok(RowWrap(rowmap_core::RowLabeled::new(names, values.into())))
    }
}
