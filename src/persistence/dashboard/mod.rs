mod entity;

pub(crate) use entity::{
    ActiveModel as DashboardActiveModel, Column as DashboardColumn, Entity as DashboardEntity,
};
