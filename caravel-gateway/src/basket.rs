use crate::envelope::{classify_response, BASKET_NAMESPACE};
use crate::http::execute;
use caravel_core::model::{BasketOutcome, ShopperId};
use caravel_core::CallResult;
use uuid::Uuid;

/// Transport action header the legacy basket endpoint dispatches on.
pub const SOAP_ACTION: &str = "#AddItem";

/// Client for the legacy SOAP basket service.
///
/// This is the one endpoint that may be reached with certificate
/// verification disabled; the override comes from configuration and is
/// scoped to the dedicated client built for this service.
pub struct BasketClient {
    http: reqwest::Client,
    url: String,
    tracking_code: String,
}

impl BasketClient {
    pub fn new(http: reqwest::Client, url: String, tracking_code: String) -> Self {
        Self {
            http,
            url,
            tracking_code,
        }
    }

    /// Submit an add-item envelope and interpret the doubly-encoded answer.
    ///
    /// Transport and HTTP failures surface as call errors; everything the
    /// service itself reports (including unreadable envelopes) comes back as
    /// a [`BasketOutcome`].
    pub async fn add_item(
        &self,
        shopper: &ShopperId,
        country_code: &str,
        currency: &str,
        product_id: &str,
    ) -> CallResult<BasketOutcome> {
        let envelope = build_add_item_envelope(
            shopper,
            country_code,
            currency,
            product_id,
            &self.tracking_code,
        );

        let body = execute(
            self.http
                .post(&self.url)
                .header("SOAPAction", SOAP_ACTION)
                .header("X-Request-Id", Uuid::new_v4().to_string())
                .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
                .body(envelope),
        )
        .await?;

        tracing::debug!(response = %body, "basket raw response");
        Ok(classify_response(&body))
    }
}

/// Render the request envelope: a SOAP 1.1 wrapper around the item-request
/// document the basket service actually reads.
pub fn build_add_item_envelope(
    shopper: &ShopperId,
    country_code: &str,
    currency: &str,
    product_id: &str,
    tracking_code: &str,
) -> String {
    format!(
        r#"<SOAP:Envelope xmlns:SOAP="http://schemas.xmlsoap.org/soap/envelope/" xmlns:soapenc="http://schemas.xmlsoap.org/soap/encoding/" xmlns:tns="{BASKET_NAMESPACE}" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <SOAP:Body SOAP:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
        <tns:AddItem>
            <bstrShopperID>{shopper}</bstrShopperID>
            <bstrRequestXML>
                <itemRequest transactionCurrency="{currency}" bill_to_country="{country_code}">
                    <item productid="{product_id}" itemTrackingCode="{tracking_code}"></item>
                </itemRequest>
            </bstrRequestXML>
        </tns:AddItem>
    </SOAP:Body>
</SOAP:Envelope>"#
    )
}
