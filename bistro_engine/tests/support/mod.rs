
use bistro_engine::{
    db_types::{NewFood, NewUser, Role, User},
    traits::{MenuManagement, UserManagement},
    SqliteDatabase,
};
use bb_common::Cents;

pub async fn seed_user(db: &SqliteDatabase, name: &str, email: &str) -> User {
    let user = NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Test Lane".to_string(),
        security_answer_hash: "not-a-real-hash".to_string(),
        role: Role::Customer,
    };
    db.create_user(user).await.expect("Error creating user")
}

pub async fn seed_food(db: &SqliteDatabase, name: &str, slug: &str, price: i64) -> i64 {
    let food = NewFood {
        name: name.to_string(),
        slug: slug.to_string(),
        description: format!("A serving of {name}"),
        price: Cents::from(price),
        category: "mains".to_string(),
        quantity: 100,
        photo: None,
    };
    let food = db.create_food(food).await.expect("Error creating food");
    food.id
}
