use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::{Request, Response};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{
    AuthEvent, AuthProvider, CountdownSource, DataStore, Error, ErrorCode, ErrorResponse, Nominee,
    Result, Session, SettingRow, TokenHandback, User, VoteRow,
};
use time::OffsetDateTime;

use crate::storage;

/// Refresh this many seconds before the access token runs out.
const REFRESH_MARGIN_SECS: i64 = 60;

fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let status_text = response.status_text();
    if response.ok() {
        return response.json::<T>().await.map_err(|e| Error::decode(e.to_string()));
    }
    let body = match response.json::<ErrorResponse>().await {
        Ok(body) => body,
        Err(_) => ErrorResponse { code: None, message: status_text },
    };
    Err(Error::from_store(status, body))
}

async fn send<T: DeserializeOwned>(request: Request) -> Result<T> {
    let response = request.send().await.map_err(|e| Error::network(e.to_string()))?;
    read_json(response).await
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self.expires_at.or_else(|| {
            self.expires_in.map(|secs| OffsetDateTime::now_utc().unix_timestamp() + secs)
        });
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Project endpoint plus the session both halves read.
struct Connection {
    url: &'static str,
    anon_key: &'static str,
    session: RefCell<Option<Session>>,
    listeners: RefCell<Vec<Box<dyn Fn(AuthEvent)>>>,
}

impl Connection {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }

    /// Signed-in requests carry the user's token so row-level security applies.
    fn bearer(&self) -> String {
        let token = self.session.borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.anon_key.to_string());
        format!("Bearer {}", token)
    }

    fn authorized(&self, request: Request, bearer: &str) -> Request {
        request.header("apikey", self.anon_key).header("Authorization", bearer)
    }

    fn emit(&self, event: AuthEvent) {
        self.listeners.borrow().iter().for_each(|listener| listener(event));
    }

    fn store_session(&self, session: Option<Session>) {
        let persisted = match &session {
            Some(s) => storage::save(storage::SESSION_KEY, s),
            None => storage::remove(storage::SESSION_KEY),
        };
        if let Err(e) = persisted {
            warn!("session not persisted: {}", e);
        }
        *self.session.borrow_mut() = session;
    }
}

/// Hosted auth (GoTrue REST).
#[derive(Clone)]
pub struct SupabaseAuth {
    conn: Rc<Connection>,
}

/// Hosted tables (PostgREST).
#[derive(Clone)]
pub struct SupabaseStore {
    conn: Rc<Connection>,
}

/// Restores any persisted session and returns both halves of the backend.
pub fn connect(url: &'static str, anon_key: &'static str) -> (SupabaseAuth, SupabaseStore) {
    let conn = Rc::new(Connection {
        url,
        anon_key,
        session: RefCell::new(storage::load::<Session>(storage::SESSION_KEY)),
        listeners: RefCell::new(Vec::new()),
    });
    (SupabaseAuth { conn: conn.clone() }, SupabaseStore { conn })
}

impl SupabaseAuth {
    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        let request = Request::post(&self.conn.endpoint("/auth/v1/token?grant_type=refresh_token"))
            .header("apikey", self.conn.anon_key)
            .json(&RefreshRequest { refresh_token })
            .map_err(|e| Error::new(ErrorCode::SystemError, e.to_string()))?;
        let session = send::<TokenResponse>(request).await?.into_session();
        self.conn.store_session(Some(session.clone()));
        self.conn.emit(AuthEvent::TokenRefreshed);
        Ok(session)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User> {
        let request = self.conn.authorized(
            Request::get(&self.conn.endpoint("/auth/v1/user")),
            &format!("Bearer {}", access_token),
        );
        send(request).await
    }

    fn drop_session(&self) {
        if self.conn.session.borrow().is_some() {
            self.conn.store_session(None);
            self.conn.emit(AuthEvent::SignedOut);
        }
    }
}

impl AuthProvider for SupabaseAuth {
    async fn current_session(&self) -> Result<Option<Session>> {
        let Some(session) = self.conn.session.borrow().clone() else {
            return Ok(None);
        };
        let now = OffsetDateTime::now_utc().unix_timestamp();
        if !session.expires_within(now, REFRESH_MARGIN_SECS) {
            return Ok(Some(session));
        }

        match self.refresh(&session.refresh_token).await {
            Ok(session) => Ok(Some(session)),
            Err(e) if e.code == ErrorCode::Network => Err(e),
            Err(e) => {
                warn!("refresh token rejected: {}", e);
                self.drop_session();
                Ok(None)
            }
        }
    }

    async fn current_user(&self) -> Result<Option<User>> {
        let Some(session) = self.current_session().await? else {
            return Ok(None);
        };
        match self.fetch_user(&session.access_token).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.code == ErrorCode::Unauthorized => {
                self.drop_session();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_in_with_redirect(&self, redirect_to: &str) -> Result<()> {
        let url = self.conn.endpoint(&format!(
            "/auth/v1/authorize?provider=google&redirect_to={}&prompt=select_account",
            encode(redirect_to)
        ));
        info!("redirecting to sign-in");
        web_sys::window()
            .ok_or_else(|| Error::new(ErrorCode::SystemError, "no window"))?
            .location()
            .set_href(&url)
            .map_err(|e| Error::new(ErrorCode::SystemError, format!("{:?}", e)))
    }

    async fn sign_out(&self) -> Result<()> {
        let bearer = self.conn.bearer();
        let request = self.conn.authorized(Request::post(&self.conn.endpoint("/auth/v1/logout")), &bearer);
        match request.send().await {
            Ok(response) if !response.ok() => warn!("logout returned {}", response.status()),
            Err(e) => warn!("logout request failed: {}", e),
            Ok(_) => {}
        }
        self.drop_session();
        Ok(())
    }

    async fn set_session(&self, handback: &TokenHandback) -> Result<Session> {
        let user = self.fetch_user(&handback.access_token).await?;
        let session = Session {
            access_token: handback.access_token.clone(),
            refresh_token: handback.refresh_token.clone(),
            expires_at: handback.expires_at,
            user,
        };
        self.conn.store_session(Some(session.clone()));
        self.conn.emit(AuthEvent::SignedIn);
        Ok(session)
    }

    fn on_auth_state_change(&self, listener: Box<dyn Fn(AuthEvent)>) {
        self.conn.listeners.borrow_mut().push(listener);
    }
}

impl SupabaseStore {
    fn get(&self, path: &str) -> Request {
        self.conn.authorized(Request::get(&self.conn.endpoint(path)), &self.conn.bearer())
    }
}

impl DataStore for SupabaseStore {
    async fn select_nominees(&self) -> Result<Vec<Nominee>> {
        send(self.get("/rest/v1/nominees?select=*")).await
    }

    async fn select_votes(&self, voter: Option<&str>) -> Result<Vec<VoteRow>> {
        let path = match voter {
            Some(id) => format!("/rest/v1/votes?select=user_id,nominee_id&user_id=eq.{}", encode(id)),
            None => "/rest/v1/votes?select=user_id,nominee_id".to_string(),
        };
        send(self.get(&path)).await
    }

    async fn insert_vote(&self, vote: &VoteRow) -> Result<VoteRow> {
        let request = self.conn
            .authorized(Request::post(&self.conn.endpoint("/rest/v1/votes")), &self.conn.bearer())
            .header("Prefer", "return=representation")
            .json(vote)
            .map_err(|e| Error::new(ErrorCode::SystemError, e.to_string()))?;
        let mut rows: Vec<VoteRow> = send(request).await?;
        rows.pop().ok_or_else(|| Error::decode("insert returned no row"))
    }

    async fn select_setting(&self, source: CountdownSource) -> Result<Option<String>> {
        let path = match source {
            CountdownSource::FirstRow => "/rest/v1/settings?select=value&limit=1".to_string(),
            CountdownSource::Key(key) => {
                format!("/rest/v1/settings?select=value&key=eq.{}&limit=1", encode(key))
            }
        };
        let rows: Vec<SettingRow> = send(self.get(&path)).await?;
        Ok(rows.into_iter().next().and_then(|row| row.value))
    }
}
