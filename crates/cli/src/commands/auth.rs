//! Account and session commands.

use echoppe_client::models::{Address, Credentials, Name, RegistrationData};

use super::{CliError, load, rejected};

/// Arguments for account creation, flattened from the CLI surface.
pub struct RegisterArgs {
    pub email: String,
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub city: String,
    pub street: String,
    pub number: u32,
    pub zipcode: String,
    pub phone: String,
}

/// Create a new account.
pub async fn register(args: RegisterArgs) -> Result<(), CliError> {
    let (mut state, backend) = load().await?;

    let data = RegistrationData {
        email: args.email,
        username: args.username,
        password: args.password,
        name: Name {
            firstname: args.firstname,
            lastname: args.lastname,
        },
        address: Address {
            city: args.city,
            street: args.street,
            number: args.number,
            zipcode: args.zipcode,
            geolocation: echoppe_client::models::Geolocation::default(),
        },
        phone: args.phone,
    };

    let user = state
        .auth
        .register(&backend, data)
        .await
        .ok_or_else(|| rejected(state.auth.error(), "registration failed"))?;

    tracing::info!("Account created: {} (id {})", user.username, user.id);
    Ok(())
}

/// Sign in and persist the session.
pub async fn login(username: &str, password: &str) -> Result<(), CliError> {
    let (mut state, backend) = load().await?;

    let credentials = Credentials::new(username, password);
    if !state.auth.login(&backend, &credentials).await {
        return Err(rejected(state.auth.error(), "invalid credentials"));
    }

    match state.auth.user_full_name() {
        Some(name) => tracing::info!("Signed in as {name}"),
        None => tracing::info!("Signed in (profile unavailable)"),
    }
    Ok(())
}

/// Clear the persisted session.
pub async fn logout() -> Result<(), CliError> {
    let (mut state, _backend) = load().await?;
    state.auth.logout();
    tracing::info!("Signed out");
    Ok(())
}

/// Show the current session.
pub async fn whoami() -> Result<(), CliError> {
    let (state, _backend) = load().await?;

    if let Some(user) = state.auth.user() {
        tracing::info!("{} <{}> (id {})", user.full_name(), user.email, user.id);
    } else if state.auth.is_authenticated() {
        tracing::info!("Signed in, profile unavailable");
    } else {
        tracing::info!("Not signed in");
    }
    Ok(())
}

/// Delete the account and everything local that belongs to it.
pub async fn delete_account() -> Result<(), CliError> {
    let (mut state, backend) = load().await?;

    if !state.delete_account(&backend).await {
        return Err(rejected(state.auth.error(), "no account to delete"));
    }

    tracing::info!("Account deleted");
    Ok(())
}
