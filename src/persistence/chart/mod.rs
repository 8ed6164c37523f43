mod entity;

pub(crate) use entity::{
    ActiveModel as ChartActiveModel, Column as ChartColumn, Entity as ChartEntity,
};
