use std::fmt::Debug;

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{CartItem, CartLine, Food, NewUser, ProfileUpdate, Role, User},
    helpers::{hash_password, verify_password},
    traits::UserManagement,
    UserApiError,
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Everything needed to open a new account. The security answer is hashed alongside the password
/// and is used for account recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub answer: String,
    /// A guest cart accumulated before registering, if any.
    #[serde(default)]
    pub cart: Option<Vec<CartItem>>,
}

/// `UserApi` handles account registration, credential checks, profile updates, and the cart and
/// wishlist state hanging off each account.
pub struct UserApi<B> {
    db: B,
}

impl<B> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi")
    }
}

impl<B> UserApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    /// Opens a new customer account. The password and security answer are hashed before they reach
    /// the backend. A guest cart supplied with the registration becomes the account cart.
    pub async fn register(&self, req: RegistrationRequest) -> Result<User, UserApiError> {
        if req.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UserApiError::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }
        let password_hash = hash_password(&req.password)?;
        let security_answer_hash = hash_password(&req.answer)?;
        let new_user = NewUser {
            name: req.name,
            email: req.email.trim().to_ascii_lowercase(),
            password_hash,
            phone: req.phone,
            address: req.address,
            security_answer_hash,
            role: Role::Customer,
        };
        let user = self.db.create_user(new_user).await?;
        info!("👤️ New account registered for {} (#{})", user.email, user.id);
        if let Some(cart) = req.cart {
            if !cart.is_empty() {
                let lines = self.db.replace_cart(user.id, &cart).await?;
                debug!("👤️ Stored {} cart line(s) carried over from registration for #{}", lines.len(), user.id);
            }
        }
        Ok(user)
    }

    /// Checks the given credentials and returns the account together with its cart. A guest cart
    /// supplied at login is merged into the account cart, summing quantities of duplicate foods.
    ///
    /// Returns [`UserApiError::InvalidCredentials`] for an unknown email as well as for a wrong
    /// password, so callers cannot probe which emails are registered.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        local_cart: Option<Vec<CartItem>>,
    ) -> Result<(User, Vec<CartLine>), UserApiError> {
        let email = email.trim().to_ascii_lowercase();
        let user = self.db.fetch_user_by_email(&email).await?.ok_or(UserApiError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            debug!("👤️ Failed login attempt for {email}");
            return Err(UserApiError::InvalidCredentials);
        }
        let cart = match local_cart {
            Some(items) if !items.is_empty() => self.db.merge_cart(user.id, &items).await?,
            _ => self.db.cart_for_user(user.id).await?,
        };
        debug!("👤️ {} logged in with {} cart line(s)", user.email, cart.len());
        Ok((user, cart))
    }

    /// Applies a partial profile update. A new password is length-checked and hashed here.
    pub async fn update_profile(
        &self,
        user_id: i64,
        name: Option<String>,
        password: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> Result<User, UserApiError> {
        let password_hash = match password {
            Some(p) => {
                if p.chars().count() < MIN_PASSWORD_LENGTH {
                    return Err(UserApiError::PasswordTooShort(MIN_PASSWORD_LENGTH));
                }
                Some(hash_password(&p)?)
            },
            None => None,
        };
        let update = ProfileUpdate { name, password_hash, phone, address };
        self.db.update_profile(user_id, update).await
    }

    pub async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, UserApiError> {
        self.db.fetch_user_by_id(user_id).await
    }

    pub async fn all_users(&self) -> Result<Vec<User>, UserApiError> {
        self.db.fetch_all_users().await
    }

    pub async fn cart(&self, user_id: i64) -> Result<Vec<CartLine>, UserApiError> {
        self.db.cart_for_user(user_id).await
    }

    /// Replaces the account cart wholesale. Last write wins.
    pub async fn replace_cart(&self, user_id: i64, items: &[CartItem]) -> Result<Vec<CartLine>, UserApiError> {
        self.db.replace_cart(user_id, items).await
    }

    /// Adds the food to the wishlist if absent, removes it otherwise, then returns the full
    /// wishlist.
    pub async fn toggle_wishlist(&self, user_id: i64, food_id: i64) -> Result<(bool, Vec<Food>), UserApiError> {
        let added = self.db.toggle_wishlist(user_id, food_id).await?;
        let wishlist = self.db.wishlist_for_user(user_id).await?;
        Ok((added, wishlist))
    }

    pub async fn wishlist(&self, user_id: i64) -> Result<Vec<Food>, UserApiError> {
        self.db.wishlist_for_user(user_id).await
    }
}
