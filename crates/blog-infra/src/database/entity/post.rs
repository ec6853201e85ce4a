//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::domain::{Category, Post};

/// Stored form of [`Category`]; values are the display names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum CategoryColumn {
    #[sea_orm(string_value = "Phishing")]
    Phishing,
    #[sea_orm(string_value = "Ransomware")]
    Ransomware,
    #[sea_orm(string_value = "Malware")]
    Malware,
    #[sea_orm(string_value = "Social Engineering")]
    SocialEngineering,
    #[sea_orm(string_value = "Data Breaches")]
    DataBreaches,
    #[sea_orm(string_value = "Identity Theft")]
    IdentityTheft,
    #[sea_orm(string_value = "Password Security")]
    PasswordSecurity,
    #[sea_orm(string_value = "Network Security")]
    NetworkSecurity,
}

impl From<CategoryColumn> for Category {
    fn from(category: CategoryColumn) -> Self {
        match category {
            CategoryColumn::Phishing => Category::Phishing,
            CategoryColumn::Ransomware => Category::Ransomware,
            CategoryColumn::Malware => Category::Malware,
            CategoryColumn::SocialEngineering => Category::SocialEngineering,
            CategoryColumn::DataBreaches => Category::DataBreaches,
            CategoryColumn::IdentityTheft => Category::IdentityTheft,
            CategoryColumn::PasswordSecurity => Category::PasswordSecurity,
            CategoryColumn::NetworkSecurity => Category::NetworkSecurity,
        }
    }
}

impl From<Category> for CategoryColumn {
    fn from(category: Category) -> Self {
        match category {
            Category::Phishing => CategoryColumn::Phishing,
            Category::Ransomware => CategoryColumn::Ransomware,
            Category::Malware => CategoryColumn::Malware,
            Category::SocialEngineering => CategoryColumn::SocialEngineering,
            Category::DataBreaches => CategoryColumn::DataBreaches,
            Category::IdentityTheft => CategoryColumn::IdentityTheft,
            Category::PasswordSecurity => CategoryColumn::PasswordSecurity,
            Category::NetworkSecurity => CategoryColumn::NetworkSecurity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: CategoryColumn,
    pub image: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            category: model.category.into(),
            image: model.image,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            category: Set(post.category.into()),
            image: Set(post.image),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
