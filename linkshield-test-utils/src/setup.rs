use mockito::{Mock, Server, ServerGuard};
use tokio::{net::TcpListener, task::JoinHandle};

use crate::{constant::TEST_ANON_KEY, error::TestError};

pub struct TestSetup {
    pub server: ServerGuard,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Self {
        let server = Server::new_async().await;

        TestSetup {
            server,
            mocks: Vec::new(),
        }
    }

    /// Base URL of the mock backend.
    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn anon_key(&self) -> &'static str {
        TEST_ANON_KEY
    }

    /// Keep a mock so [`assert_mocks`](Self::assert_mocks) verifies it.
    pub fn track(&mut self, mock: Mock) -> &mut Self {
        self.mocks.push(mock);
        self
    }

    /// Assert all tracked mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }

    /// Bind a TCP listener that accepts connections and never answers.
    ///
    /// Used to exercise request deadlines. The returned handle keeps accepted sockets
    /// open until it is aborted.
    ///
    /// # Returns
    /// - `String` - Base URL of the silent server
    /// - `JoinHandle<()>` - The accept loop
    pub async fn silent_server() -> Result<(String, JoinHandle<()>), TestError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        Ok((format!("http://{}", address), handle))
    }
}
