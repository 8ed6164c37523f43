mod entity;

pub(crate) use entity::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as CommentEntity,
};
