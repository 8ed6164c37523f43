mod entity;

pub(crate) use entity::{ActiveModel as LikeActiveModel, Column as LikeColumn, Entity as LikeEntity};
