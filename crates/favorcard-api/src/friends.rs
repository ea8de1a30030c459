// Friend endpoints
//
// All paths hang off a configurable prefix (`users/friends` by default)
// since deployed servers disagree on where the friends API lives.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ApiFriendEntry, ApiUser, FriendListResponse, MessageResponse, UsersResponse};

impl ApiClient {
    fn friends_url(&self, suffix: &str) -> Result<url::Url, Error> {
        let prefix = self.friends_path();
        if suffix.is_empty() {
            self.api_url(prefix)
        } else {
            self.api_url(&format!("{prefix}/{suffix}"))
        }
    }

    /// Accepted friends, most recent interaction first.
    ///
    /// `GET /api/{friends}`
    pub async fn list_friends(&self) -> Result<Vec<ApiUser>, Error> {
        let url = self.friends_url("")?;
        debug!("listing friends");
        let resp: UsersResponse = self.get(url).await?;
        Ok(resp.users)
    }

    /// Search users with their invitation state relative to the viewer.
    ///
    /// `GET /api/{friends}/search?q=...`
    pub async fn search_friends(&self, query: &str) -> Result<Vec<ApiFriendEntry>, Error> {
        let mut url = self.friends_url("search")?;
        url.query_pairs_mut().append_pair("q", query);
        debug!(query, "searching friend candidates");
        let resp: FriendListResponse = self.get(url).await?;
        Ok(resp.into_entries("default"))
    }

    /// Invitations the viewer has sent.
    ///
    /// `GET /api/{friends}/myInvite/list`
    pub async fn list_sent_invites(&self) -> Result<Vec<ApiFriendEntry>, Error> {
        let url = self.friends_url("myInvite/list")?;
        debug!("listing sent invitations");
        let resp: FriendListResponse = self.get(url).await?;
        Ok(resp.into_entries("pending"))
    }

    /// Invitations the viewer has received.
    ///
    /// `GET /api/{friends}/inviteMy/list`
    pub async fn list_received_invites(&self) -> Result<Vec<ApiFriendEntry>, Error> {
        let url = self.friends_url("inviteMy/list")?;
        debug!("listing received invitations");
        let resp: FriendListResponse = self.get(url).await?;
        Ok(resp.into_entries("pending"))
    }

    /// Invite a user to become a friend.
    ///
    /// `POST /api/{friends}/{user_id}/invite`
    pub async fn invite_friend(&self, user_id: &str) -> Result<MessageResponse, Error> {
        let url = self.friends_url(&format!("{user_id}/invite"))?;
        debug!(user_id, "sending friend invitation");
        self.post(url, None::<&()>).await
    }

    /// Accept a pending invitation from `user_id`.
    ///
    /// `POST /api/{friends}/{user_id}/accept`
    pub async fn accept_friend(&self, user_id: &str) -> Result<MessageResponse, Error> {
        let url = self.friends_url(&format!("{user_id}/accept"))?;
        debug!(user_id, "accepting friend invitation");
        self.post(url, None::<&()>).await
    }
}
