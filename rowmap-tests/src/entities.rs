use rowmap::Entity;
use time::PrimitiveDateTime;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[rowmap(name = "users")]
pub struct User {
    #[rowmap(primary_key)]
    pub id: i32,
    #[rowmap(name = "user_name")]
    pub name: String,
    pub age: i32,
    pub registration_date: Option<PrimitiveDateTime>,
    pub address: Option<String>,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[rowmap(name = "towns")]
pub struct Town {
    #[rowmap(primary_key)]
    pub id: i64,
    pub name: String,
}
