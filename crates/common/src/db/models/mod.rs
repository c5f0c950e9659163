//! SeaORM entity models

mod lead;
mod university;

pub use university::{
    Entity as UniversityEntity,
    Model as University,
    ActiveModel as UniversityActiveModel,
    Column as UniversityColumn,
};

pub use lead::{
    Entity as LeadEntity,
    Model as Lead,
    ActiveModel as LeadActiveModel,
    Column as LeadColumn,
};
