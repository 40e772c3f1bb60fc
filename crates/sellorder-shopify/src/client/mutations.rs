//! The three reorder mutations, exposed through [`CatalogWriter`].

use async_trait::async_trait;
use sellorder_engine::{CatalogWriter, OptionOrder, UserError, VariantPosition, WriteOutcome};
use serde::Serialize;

use crate::error::ShopifyError;
use crate::queries::{REORDER_MEDIA, REORDER_OPTIONS, REORDER_VARIANTS};
use crate::types::{ReorderMediaData, ReorderOptionsData, ReorderVariantsData, UserErrorNode};

use super::ShopifyClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderOptionsVariables<'a> {
    product_id: &'a str,
    options: Vec<OptionReorderInput<'a>>,
}

#[derive(Serialize)]
struct OptionReorderInput<'a> {
    name: &'a str,
    values: Vec<OptionValueInput<'a>>,
}

#[derive(Serialize)]
struct OptionValueInput<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderVariantsVariables<'a> {
    product_id: &'a str,
    positions: Vec<VariantPositionInput<'a>>,
}

#[derive(Serialize)]
struct VariantPositionInput<'a> {
    id: &'a str,
    position: u32,
}

#[derive(Serialize)]
struct ReorderMediaVariables<'a> {
    id: &'a str,
    moves: Vec<MoveInput<'a>>,
}

/// `newPosition` is an `UnsignedInt64`, which the API takes as a string.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveInput<'a> {
    id: &'a str,
    new_position: String,
}

fn options_variables<'a>(
    product_id: &'a str,
    options: &'a [OptionOrder],
) -> ReorderOptionsVariables<'a> {
    ReorderOptionsVariables {
        product_id,
        options: options
            .iter()
            .map(|option| OptionReorderInput {
                name: &option.name,
                values: option
                    .values
                    .iter()
                    .map(|value| OptionValueInput { name: value })
                    .collect(),
            })
            .collect(),
    }
}

fn variants_variables<'a>(
    product_id: &'a str,
    positions: &'a [VariantPosition],
) -> ReorderVariantsVariables<'a> {
    ReorderVariantsVariables {
        product_id,
        positions: positions
            .iter()
            .map(|p| VariantPositionInput {
                id: &p.variant_id,
                position: p.position,
            })
            .collect(),
    }
}

fn media_variables<'a>(product_id: &'a str, image_ids: &'a [String]) -> ReorderMediaVariables<'a> {
    ReorderMediaVariables {
        id: product_id,
        moves: image_ids
            .iter()
            .enumerate()
            .map(|(index, id)| MoveInput {
                id,
                new_position: index.to_string(),
            })
            .collect(),
    }
}

fn write_outcome(user_errors: Vec<UserErrorNode>, product_returned: bool) -> WriteOutcome {
    WriteOutcome {
        user_errors: user_errors
            .into_iter()
            .map(|e| UserError {
                field: e.field.unwrap_or_default(),
                message: e.message,
            })
            .collect(),
        product_returned,
    }
}

#[async_trait]
impl CatalogWriter for ShopifyClient {
    type Error = ShopifyError;

    async fn reorder_options(
        &self,
        product_id: &str,
        options: &[OptionOrder],
    ) -> Result<WriteOutcome, Self::Error> {
        let context = format!("productOptionsReorder({product_id})");
        let response = self
            .execute::<_, ReorderOptionsData>(
                REORDER_OPTIONS,
                options_variables(product_id, options),
                &context,
            )
            .await?;
        let payload = Self::into_data(response, &context)?
            .product_options_reorder
            .ok_or(ShopifyError::MissingData { context })?;
        Ok(write_outcome(payload.user_errors, payload.product.is_some()))
    }

    async fn reorder_variants(
        &self,
        product_id: &str,
        positions: &[VariantPosition],
    ) -> Result<WriteOutcome, Self::Error> {
        let context = format!("productVariantsBulkReorder({product_id})");
        let response = self
            .execute::<_, ReorderVariantsData>(
                REORDER_VARIANTS,
                variants_variables(product_id, positions),
                &context,
            )
            .await?;
        let payload = Self::into_data(response, &context)?
            .product_variants_bulk_reorder
            .ok_or(ShopifyError::MissingData { context })?;
        Ok(write_outcome(payload.user_errors, payload.product.is_some()))
    }

    async fn reorder_images(
        &self,
        product_id: &str,
        image_ids: &[String],
    ) -> Result<WriteOutcome, Self::Error> {
        let context = format!("productReorderMedia({product_id})");
        let response = self
            .execute::<_, ReorderMediaData>(
                REORDER_MEDIA,
                media_variables(product_id, image_ids),
                &context,
            )
            .await?;
        let payload = Self::into_data(response, &context)?
            .product_reorder_media
            .ok_or(ShopifyError::MissingData { context })?;
        Ok(write_outcome(payload.media_user_errors, payload.job.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn option_variables_shape() {
        let options = vec![OptionOrder {
            option_id: "gid://shopify/ProductOption/1".to_owned(),
            name: "Color".to_owned(),
            values: vec!["Red".to_owned(), "Blue".to_owned()],
        }];
        let value = serde_json::to_value(options_variables("gid://shopify/Product/1", &options))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "productId": "gid://shopify/Product/1",
                "options": [{ "name": "Color", "values": [{ "name": "Red" }, { "name": "Blue" }] }]
            })
        );
    }

    #[test]
    fn variant_variables_shape() {
        let positions = vec![VariantPosition {
            variant_id: "v1".to_owned(),
            position: 1,
        }];
        let value = serde_json::to_value(variants_variables("p1", &positions)).unwrap();
        assert_eq!(
            value,
            json!({ "productId": "p1", "positions": [{ "id": "v1", "position": 1 }] })
        );
    }

    #[test]
    fn media_moves_are_zero_based_strings() {
        let ids = vec!["m2".to_owned(), "m1".to_owned()];
        let value = serde_json::to_value(media_variables("p1", &ids)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "p1",
                "moves": [
                    { "id": "m2", "newPosition": "0" },
                    { "id": "m1", "newPosition": "1" }
                ]
            })
        );
    }

    #[test]
    fn user_errors_without_field_get_empty_path() {
        let outcome = write_outcome(
            vec![UserErrorNode {
                field: None,
                message: "nope".to_owned(),
            }],
            false,
        );
        assert_eq!(outcome.user_errors[0].field, Vec::<String>::new());
        assert!(!outcome.product_returned);
    }
}
