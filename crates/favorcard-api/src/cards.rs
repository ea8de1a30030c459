// Card endpoints
//
// Listing, creation and the three lifecycle transitions (send, use,
// delete). Ownership and status rules are enforced by the server; these
// methods forward the request and surface its verdict.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    ApiCard, CardEnvelope, CardsResponse, CreateCardRequest, MessageResponse, SendCardRequest,
};

impl ApiClient {
    /// Cards created by the authenticated user, newest first.
    ///
    /// `GET /api/cards`
    pub async fn list_created_cards(&self) -> Result<Vec<ApiCard>, Error> {
        let url = self.api_url("cards")?;
        debug!("listing created cards");
        let resp: CardsResponse = self.get(url).await?;
        Ok(resp.cards)
    }

    /// Cards owned by the authenticated user but created by someone else.
    ///
    /// `GET /api/cards/received`
    pub async fn list_received_cards(&self) -> Result<Vec<ApiCard>, Error> {
        let url = self.api_url("cards/received")?;
        debug!("listing received cards");
        let resp: CardsResponse = self.get(url).await?;
        Ok(resp.cards)
    }

    /// Create a card owned by its creator.
    ///
    /// `POST /api/cards` with `{"title", "description", "expires_at"?}`
    pub async fn create_card(&self, request: &CreateCardRequest) -> Result<CardEnvelope, Error> {
        let url = self.api_url("cards")?;
        debug!(title = %request.title, "creating card");
        self.post(url, Some(request)).await
    }

    /// Transfer a card to another user.
    ///
    /// `POST /api/cards/{id}/send` with `{"to_username"}`
    pub async fn send_card(&self, card_id: &str, to_username: &str) -> Result<CardEnvelope, Error> {
        let url = self.api_url(&format!("cards/{card_id}/send"))?;
        debug!(card_id, to_username, "sending card");
        let body = SendCardRequest {
            to_username: to_username.to_owned(),
        };
        self.post(url, Some(&body)).await
    }

    /// Redeem a card.
    ///
    /// `POST /api/cards/{id}/use`
    pub async fn use_card(&self, card_id: &str) -> Result<CardEnvelope, Error> {
        let url = self.api_url(&format!("cards/{card_id}/use"))?;
        debug!(card_id, "using card");
        self.post(url, None::<&()>).await
    }

    /// Delete a card (creator who still owns it only).
    ///
    /// `POST /api/cards/{id}/delete`
    pub async fn delete_card(&self, card_id: &str) -> Result<MessageResponse, Error> {
        let url = self.api_url(&format!("cards/{card_id}/delete"))?;
        debug!(card_id, "deleting card");
        self.post(url, None::<&()>).await
    }
}
