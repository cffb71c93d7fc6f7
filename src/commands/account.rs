use anyhow::Result;
use uuid::Uuid;

use crate::models::User;
use crate::services::session::Session;

const DEFAULT_PICTURE: &str = "https://picsum.photos/id/64/100/100";

pub fn login(session: &mut Session, name: &str, email: Option<String>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        println!("A display name is required to sign in.");
        return Ok(());
    }
    let email = email.unwrap_or_else(|| {
        format!("{}@example.com", name.to_lowercase().replace(' ', "."))
    });
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        picture: DEFAULT_PICTURE.to_string(),
    };
    let greeting = format!("Signed in as {} <{}>.", user.name, user.email);
    session.login(user);
    println!("{}", greeting);
    Ok(())
}

pub fn logout(session: &mut Session) -> Result<()> {
    if session.user().is_none() {
        println!("Not signed in.");
        return Ok(());
    }
    session.logout();
    println!("Signed out; back to the guest collections.");
    Ok(())
}

pub fn whoami(session: &Session) -> Result<()> {
    match session.user() {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("guest"),
    }
    Ok(())
}
