//! Shared fixtures for bot-runtime integration tests.

#![allow(dead_code)]

pub mod mock_gateway;

use botkit_core::{
    RawCallbackQuery, RawChat, RawEntity, RawMessage, RawOrderInfo, RawPhotoSize,
    RawPreCheckoutQuery, RawSuccessfulPayment, RawUpdate, RawUser, ENTITY_MENTION,
};

pub fn user(id: i64) -> RawUser {
    RawUser {
        id,
        first_name: "Test".to_string(),
        last_name: Some("User".to_string()),
        username: Some(format!("user{id}")),
    }
}

pub fn raw_message(message_id: i32, user_id: i64, chat_id: i64, text: &str) -> RawMessage {
    RawMessage {
        message_id,
        from: Some(user(user_id)),
        chat: Some(RawChat { id: chat_id }),
        text: Some(text.to_string()),
        ..Default::default()
    }
}

pub fn text_update(user_id: i64, chat_id: i64, text: &str) -> RawUpdate {
    RawUpdate {
        update_id: 1,
        message: Some(raw_message(10, user_id, chat_id, text)),
        ..Default::default()
    }
}

pub fn mention_update(user_id: i64, chat_id: i64, login: &str) -> RawUpdate {
    let text = format!("@{login}");
    let mut message = raw_message(11, user_id, chat_id, &text);
    message.entities = vec![RawEntity {
        kind: ENTITY_MENTION.to_string(),
        offset: 0,
        length: text.len(),
    }];
    RawUpdate {
        update_id: 2,
        message: Some(message),
        ..Default::default()
    }
}

pub fn photo_update(user_id: i64, chat_id: i64) -> RawUpdate {
    let mut message = raw_message(12, user_id, chat_id, "");
    message.text = None;
    message.photo = vec![
        RawPhotoSize {
            file_id: "small".to_string(),
            width: 90,
            height: 90,
        },
        RawPhotoSize {
            file_id: "large".to_string(),
            width: 800,
            height: 800,
        },
    ];
    RawUpdate {
        update_id: 3,
        message: Some(message),
        ..Default::default()
    }
}

pub fn callback_update(user_id: i64, chat_id: i64, data: &str) -> RawUpdate {
    RawUpdate {
        update_id: 4,
        callback_query: Some(RawCallbackQuery {
            id: "cb-1".to_string(),
            from: user(user_id),
            message: Some(raw_message(20, user_id, chat_id, "pick one")),
            data: Some(data.to_string()),
        }),
        ..Default::default()
    }
}

pub fn checkout_update(user_id: i64, checkout_id: &str, amount: i64) -> RawUpdate {
    RawUpdate {
        update_id: 5,
        pre_checkout_query: Some(RawPreCheckoutQuery {
            id: checkout_id.to_string(),
            from: user(user_id),
            currency: "RUB".to_string(),
            total_amount: amount,
            invoice_payload: "order-1".to_string(),
            order_info: Some(RawOrderInfo {
                email: Some("buyer@example.com".to_string()),
            }),
        }),
        ..Default::default()
    }
}

pub fn charge_update(user_id: i64, chat_id: i64, amount: i64) -> RawUpdate {
    let mut message = raw_message(30, user_id, chat_id, "");
    message.text = None;
    message.successful_payment = Some(RawSuccessfulPayment {
        currency: "RUB".to_string(),
        total_amount: amount,
        invoice_payload: "order-1".to_string(),
        telegram_payment_charge_id: "tg-charge".to_string(),
        provider_payment_charge_id: "provider-charge".to_string(),
    });
    RawUpdate {
        update_id: 6,
        message: Some(message),
        ..Default::default()
    }
}
