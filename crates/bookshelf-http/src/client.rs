//! Typed client for the bookshelf API.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use bookshelf_core::models::{
    Book, BookForm, LoginRequest, LoginResponse, Profile, ProfileUpdate, ReadingList,
    Registration, ReorderRequest,
};
use bookshelf_core::{
    ApiRequest, ApiResponse, ApiUrl, BookId, ClientConfig, Credentials, MediaBaseUrl, Navigator,
    ReadingListId, Result, Session, TokenStore, Transport,
};

use crate::endpoints;
use crate::refresh::AuthLayer;
use crate::transport::HttpTransport;

#[derive(Serialize)]
struct NewReadingList<'a> {
    name: &'a str,
}

/// Client for the bookshelf API.
///
/// All calls go through an [`AuthLayer`], so they carry the session's
/// bearer token and survive one access-token expiry. Cloning is cheap and
/// clones share the session and any in-flight refresh.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use bookshelf_core::{ClientConfig, Credentials, MemoryTokenStore, RecordingNavigator};
/// use bookshelf_http::BookshelfClient;
///
/// # async fn example() -> Result<(), bookshelf_core::Error> {
/// let client = BookshelfClient::new(
///     ClientConfig::from_env()?,
///     Arc::new(MemoryTokenStore::new()),
///     Arc::new(RecordingNavigator::new()),
/// )?;
/// client.login(&Credentials::new("alice", "secret")).await?;
/// for book in client.my_books().await? {
///     println!("{}", book.title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BookshelfClient {
    http: AuthLayer<HttpTransport>,
    media: MediaBaseUrl,
}

impl BookshelfClient {
    /// Create a client over the given token store.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        let session = Session::new(store);
        Ok(Self {
            http: AuthLayer::new(transport, session, navigator),
            media: config.media_base_url,
        })
    }

    /// The session shared with the refresh layer.
    pub fn session(&self) -> &Session {
        self.http.session()
    }

    pub fn base_url(&self) -> &ApiUrl {
        self.http.transport().base_url()
    }

    pub fn media_base(&self) -> &MediaBaseUrl {
        &self.media
    }

    /// Resolve a media path returned by the API into an absolute URL.
    pub fn media_url(&self, path: &str) -> String {
        self.media.resolve(path)
    }

    // ========================================================================
    // Raw verbs
    // ========================================================================

    /// Send an arbitrary request through the refresh layer.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.http.execute(request).await
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(path)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.json()
    }

    // ========================================================================
    // Account
    // ========================================================================

    /// Create an account. Does not log in.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        registration.validate()?;
        let request = ApiRequest::post(endpoints::REGISTER).with_json(registration)?;
        // Credential exchanges bypass the refresh layer.
        self.http.transport().send(&request).await?;
        info!("Account registered");
        Ok(())
    }

    /// Log in and store the issued tokens and the username.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let request = ApiRequest::post(endpoints::LOGIN).with_json(&LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        })?;
        let response: LoginResponse = self.http.transport().send(&request).await?.json()?;

        self.session()
            .begin(&response.into_tokens(), Some(credentials.username()))?;
        info!("Logged in");
        Ok(())
    }

    /// Forget the stored session. Purely local.
    pub fn logout(&self) -> Result<()> {
        self.session().end()
    }

    /// The logged-in user's profile.
    pub async fn profile(&self) -> Result<Profile> {
        self.get_json(endpoints::PROFILE).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        let request = ApiRequest::put(endpoints::PROFILE).with_form(update.to_form());
        self.send(request).await?.json()
    }

    // ========================================================================
    // Books
    // ========================================================================

    /// Books owned by the logged-in user.
    pub async fn my_books(&self) -> Result<Vec<Book>> {
        self.get_json(endpoints::BOOKS).await
    }

    /// Every book in the shared catalogue.
    pub async fn catalogue(&self) -> Result<Vec<Book>> {
        self.get_json(endpoints::ALL_BOOKS).await
    }

    pub async fn book_detail(&self, id: BookId) -> Result<Book> {
        self.get_json(&endpoints::book_detail(id)).await
    }

    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_book(&self, form: &BookForm) -> Result<Book> {
        let request = ApiRequest::post(endpoints::BOOKS).with_form(form.to_form());
        let book: Book = self.send(request).await?.json()?;
        debug!(id = %book.id, "Book created");
        Ok(book)
    }

    #[instrument(skip(self, form))]
    pub async fn update_book(&self, id: BookId, form: &BookForm) -> Result<Book> {
        let request = ApiRequest::put(endpoints::book(id)).with_form(form.to_form());
        self.send(request).await?.json()
    }

    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: BookId) -> Result<()> {
        self.delete(&endpoints::book_delete(id)).await?;
        Ok(())
    }

    // ========================================================================
    // Reading lists
    // ========================================================================

    /// The logged-in user's reading lists, entries sorted by position.
    pub async fn reading_lists(&self) -> Result<Vec<ReadingList>> {
        let mut lists: Vec<ReadingList> = self.get_json(endpoints::READING_LISTS).await?;
        for list in &mut lists {
            list.sort_entries();
        }
        Ok(lists)
    }

    #[instrument(skip(self))]
    pub async fn create_reading_list(&self, name: &str) -> Result<()> {
        self.post_json(endpoints::READING_LISTS, &NewReadingList { name })
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_reading_list(&self, id: ReadingListId) -> Result<()> {
        self.delete(&endpoints::reading_list(id)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn add_to_reading_list(&self, list: ReadingListId, book: BookId) -> Result<()> {
        self.send(ApiRequest::post(endpoints::reading_list_add(list, book)))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_from_reading_list(&self, list: ReadingListId, book: BookId) -> Result<()> {
        self.delete(&endpoints::reading_list_remove(list, book))
            .await?;
        Ok(())
    }

    /// Persist a new entry order.
    #[instrument(skip(self, order), fields(entries = order.books.len()))]
    pub async fn reorder_reading_list(
        &self,
        list: ReadingListId,
        order: &ReorderRequest,
    ) -> Result<()> {
        self.put_json(&endpoints::reading_list_reorder(list), order)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for BookshelfClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookshelfClient")
            .field("base_url", self.base_url())
            .field("media", &self.media)
            .finish()
    }
}
