//! HTTP Handlers

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::{Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::{
    change_password::ChangePasswordUseCase,
    link_oauth::OAuthLoginUseCase,
    login::{LoginInput, LoginUseCase},
    profile::{ProfileUpdate, ProfileUseCase},
    register::{RegisterInput, RegisterUseCase},
    request_reset::RequestResetUseCase,
    reset_password::ResetPasswordUseCase,
    verify_otp::VerifyOtpUseCase,
};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{identity_id::IdentityId, provider::Provider};
use crate::error::{AuthError, AuthResult};
use crate::infra::oauth::OAuthGateway;
use crate::presentation::dto::{
    ChangePasswordRequest, DataResponse, IdentityDto, LoginRequest, MessageResponse,
    OAuthCallbackQuery, RequestOtpRequest, ResetPasswordRequest, SetPasswordRequest,
    VerifyOtpRequest,
};
use crate::presentation::middleware::{CurrentIdentity, ResetSubject};
use kernel::page::{Page, PagedResponse};
use platform::mailer::Mailer;
use platform::media::MediaStore;
use platform::token::TokenService;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
    pub mailer: Arc<dyn Mailer>,
    pub media: Arc<dyn MediaStore>,
    pub oauth: Arc<dyn OAuthGateway>,
}

// ============================================================================
// Multipart form
// ============================================================================

/// Text fields and at most one file pulled out of a multipart body
#[derive(Default)]
struct ProfileForm {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    location: Option<String>,
    file: Option<(String, Vec<u8>)>,
}

async fn read_profile_form(mut multipart: Multipart) -> AuthResult<ProfileForm> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AuthError::Validation(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" | "thumbnail" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AuthError::Validation(e.to_string()))?;
                form.file = Some((filename, bytes.to_vec()));
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AuthError::Validation(e.to_string()))?;
                match name.as_str() {
                    "firstName" => form.first_name = Some(value),
                    "lastName" => form.last_name = Some(value),
                    "email" => form.email = Some(value),
                    "password" => form.password = Some(value),
                    "location" => form.location = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

fn session_cookie(config: &AuthConfig, token: &str) -> String {
    config.cookie.build_set_cookie(token, config.session_ttl_secs())
}

fn reset_cookie(config: &AuthConfig, token: &str) -> String {
    config.cookie.build_set_cookie(token, config.reset_ttl_secs())
}

// ============================================================================
// Account creation and login
// ============================================================================

/// POST /create-form (multipart)
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    multipart: Multipart,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let form = read_profile_form(multipart).await?;

    let input = RegisterInput {
        first_name: form
            .first_name
            .ok_or_else(|| AuthError::MissingField("firstName".to_string()))?,
        last_name: form
            .last_name
            .ok_or_else(|| AuthError::MissingField("lastName".to_string()))?,
        email: form
            .email
            .ok_or_else(|| AuthError::MissingField("email".to_string()))?,
        password: form
            .password
            .ok_or_else(|| AuthError::MissingField("password".to_string()))?,
        thumbnail: form.file,
        location: form.location,
    };

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.media.clone(),
        state.mailer.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );
    let output = use_case.execute(input).await?;

    let cookie = session_cookie(&state.config, &output.session_token);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(DataResponse::with_message(
            "User created successfully",
            IdentityDto::from(&output.identity),
        )),
    ))
}

/// POST /sign-in-user
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.tokens.clone(), state.config.clone());
    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = session_cookie(&state.config, &output.session_token);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(DataResponse::with_message(
            "Login successful",
            IdentityDto::from(&output.identity),
        )),
    ))
}

/// GET /logout
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let cookie = state.config.cookie.build_delete_cookie();
    (
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::ok("Logout successful")),
    )
}

// ============================================================================
// Profile
// ============================================================================

/// GET /get-user-by-id/{id}
pub async fn get_by_id<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
) -> AuthResult<Json<DataResponse<IdentityDto>>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let identity_id: IdentityId = id.parse().map_err(|_| AuthError::UserNotFound)?;
    let use_case = ProfileUseCase::new(state.repo.clone(), state.media.clone());
    let identity = use_case.get_by_id(&identity_id).await?;
    Ok(Json(DataResponse::ok(IdentityDto::from(&identity))))
}

/// GET /get-user-by-name/{name}?page=&limit=
pub async fn get_by_name<R>(
    State(state): State<AuthAppState<R>>,
    Path(name): Path<String>,
    Query(page): Query<Page>,
) -> AuthResult<Json<PagedResponse<IdentityDto>>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.media.clone());
    let paged = use_case.search_by_name(&name, page).await?;
    Ok(Json(PagedResponse::from_paged(&paged, |i| {
        IdentityDto::from(i)
    })))
}

/// PUT /update-user (multipart)
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    multipart: Multipart,
) -> AuthResult<Json<DataResponse<IdentityDto>>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let form = read_profile_form(multipart).await?;

    let update = ProfileUpdate {
        first_name: form.first_name,
        last_name: form.last_name,
        location: form.location,
        thumbnail: form.file,
    };

    let use_case = ProfileUseCase::new(state.repo.clone(), state.media.clone());
    let identity = use_case.update(&current.0.identity_id, update).await?;

    Ok(Json(DataResponse::with_message(
        "User updated successfully",
        IdentityDto::from(&identity),
    )))
}

/// DELETE /delete-user
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.media.clone());
    use_case.delete(&current.0.identity_id).await?;

    let cookie = state.config.cookie.build_delete_cookie();
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::ok("User deleted successfully")),
    ))
}

// ============================================================================
// Passwords
// ============================================================================

/// POST /set-password
pub async fn set_password<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Json(req): Json<SetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    ChangePasswordUseCase::new(state.repo.clone())
        .set_initial(&current.0.identity_id, req.password)
        .await?;
    Ok(Json(MessageResponse::ok("Password set successfully")))
}

/// POST /change-password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    ChangePasswordUseCase::new(state.repo.clone())
        .execute(&current.0.identity_id, req.current_password, req.new_password)
        .await?;
    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

// ============================================================================
// OTP reset flow
// ============================================================================

/// POST /password-reset-otp
pub async fn request_otp<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RequestOtpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = RequestResetUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );
    let output = use_case.execute(req.email).await?;

    let cookie = reset_cookie(&state.config, &output.reset_token);

    // Same answer whether or not the account exists
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::ok(
            "If that email is registered, an OTP has been sent",
        )),
    ))
}

/// POST /verify-otp
pub async fn verify_otp<R>(
    State(state): State<AuthAppState<R>>,
    Extension(subject): Extension<ResetSubject>,
    Json(req): Json<VerifyOtpRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    VerifyOtpUseCase::new(state.repo.clone())
        .execute(&subject.0, &req.otp)
        .await?;
    Ok(Json(MessageResponse::ok("OTP verified successfully")))
}

/// POST /reset-password
pub async fn reset_password<R>(
    State(state): State<AuthAppState<R>>,
    Extension(subject): Extension<ResetSubject>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    ResetPasswordUseCase::new(state.repo.clone())
        .execute(&subject.0, req.password)
        .await?;

    // The reset token is single-purpose; drop it with the password change
    let cookie = state.config.cookie.build_delete_cookie();
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::ok("Password reset successfully")),
    ))
}

// ============================================================================
// OAuth
// ============================================================================

/// GET /auth/{provider}
pub async fn oauth_start<R>(
    State(state): State<AuthAppState<R>>,
    Path(provider): Path<String>,
) -> AuthResult<Redirect>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let provider: Provider = provider.parse().map_err(|_| AuthError::OAuthFailed)?;
    let state_param = Uuid::new_v4().to_string();
    let url = state.oauth.authorize_url(provider, &state_param)?;
    Ok(Redirect::temporary(&url))
}

/// GET /auth/{provider}/callback
pub async fn oauth_callback<R>(
    State(state): State<AuthAppState<R>>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthCallbackQuery>,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let provider: Provider = provider.parse().map_err(|_| AuthError::OAuthFailed)?;
    let code = query.code.ok_or(AuthError::OAuthFailed)?;

    let profile = state.oauth.exchange(provider, &code).await?;

    let use_case =
        OAuthLoginUseCase::new(state.repo.clone(), state.tokens.clone(), state.config.clone());
    let output = use_case.execute(profile).await?;

    let cookie = session_cookie(&state.config, &output.session_token);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::temporary(&state.config.oauth_redirect_base),
    ))
}
