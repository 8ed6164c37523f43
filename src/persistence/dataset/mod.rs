mod entity;

pub(crate) use entity::{
    ActiveModel as DatasetActiveModel, Column as DatasetColumn, Entity as DatasetEntity,
};
