#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, LazyLock},
};

use groupkeeper::{
    app::{
        avatar::{typeface::Typeface, AvatarAssets, AvatarRenderer},
        build_bot, BotContext,
    },
    config::{AppConfig, Stage},
    telemetry::{build_telemetry, register_telemetry},
};
use image::{Rgb, RgbImage};
use secrecy::SecretString;
use serde_json::{json, Value};
use teloxide::{
    types::{Message, UserId},
    Bot,
};
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "123456:TEST-TOKEN";
pub const BOT_ID: u64 = 777;
pub const BOT_USERNAME: &str = "KeeperBot";
pub const ADMIN_ID: u64 = 1001;
pub const MEMBER_ID: u64 = 1002;
pub const GROUP_ID: i64 = -1001234567890;

static TELEMETRY: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let telemetry = build_telemetry(
            Stage::Dev,
            subscriber_name,
            default_filter_level,
            std::io::stdout,
        );
        register_telemetry(telemetry);
    } else {
        let null_telemetry =
            build_telemetry(Stage::Dev, subscriber_name, default_filter_level, std::io::sink);
        register_telemetry(null_telemetry);
    };
});

/// Square glyphs: every character is half an em wide and lines are one em
/// tall. Draws solid blocks so tests can look at pixels without a font file.
pub struct BlockFace;

impl Typeface for BlockFace {
    fn text_width(&self, text: &str, size: u32) -> i32 {
        (text.chars().count() as f32 * size as f32 * 0.5).ceil() as i32
    }

    fn line_height(&self, size: u32) -> i32 {
        size as i32
    }

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, size: u32, text: &str, color: Rgb<u8>) {
        let (w, h) = (self.text_width(text, size), self.line_height(size));

        for py in y.max(0)..(y + h).min(canvas.height() as i32) {
            for px in x.max(0)..(x + w).min(canvas.width() as i32) {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// 64x64 white logo and the block typeface.
pub fn test_assets() -> AvatarAssets {
    AvatarAssets::new(
        Arc::new(BlockFace),
        RgbImage::from_pixel(64, 64, Rgb([255, 255, 255])),
    )
}

pub fn test_renderer() -> AvatarRenderer {
    AvatarRenderer::new(test_assets())
}

pub fn static_path(file: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static").join(file)
}

/// The font and logo the bot ships with.
pub fn shipped_assets() -> AvatarAssets {
    AvatarAssets::load(&static_path("DejaVuSans-Bold.ttf"), &static_path("logo.png"))
        .expect("failed to load the checked-in assets")
}

pub struct TestBot {
    pub server: MockServer,
    pub bot: Bot,
    pub ctx: BotContext,
}

impl TestBot {
    /// Expect `times` calls of a Bot API method and answer them with `result`.
    pub async fn expect_call(&self, api_method: &str, result: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path_regex(format!(r"(?i)^/bot[^/]+/{api_method}$")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": result
            })))
            .expect(times)
            .named(api_method)
            .mount(&self.server)
            .await;
    }

    /// Expect `times` calls of a Bot API method and fail them like Telegram does.
    pub async fn expect_failure(&self, api_method: &str, description: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path_regex(format!(r"(?i)^/bot[^/]+/{api_method}$")))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": description
            })))
            .expect(times)
            .named(api_method)
            .mount(&self.server)
            .await;
    }

    /// Answer `getChatMember` with the given status for everyone.
    pub async fn chat_member_status(&self, status: &str) {
        let mut member = json!({
            "status": status,
            "user": user(ADMIN_ID, "Admin"),
        });
        match status {
            "creator" => member["is_anonymous"] = json!(false),
            "administrator" => {
                for right in [
                    "can_be_edited",
                    "is_anonymous",
                    "can_manage_chat",
                    "can_delete_messages",
                    "can_manage_video_chats",
                    "can_restrict_members",
                    "can_promote_members",
                    "can_change_info",
                    "can_invite_users",
                    "can_post_messages",
                    "can_edit_messages",
                    "can_pin_messages",
                    "can_manage_topics",
                    "can_post_stories",
                    "can_edit_stories",
                    "can_delete_stories",
                ] {
                    member[right] = json!(right.starts_with("can_") && right != "can_be_edited");
                }
            }
            _ => {}
        }

        self.expect_call("getChatMember", member, 1).await;
    }

    /// Raw bodies of the requests made to one Bot API method, in order.
    pub async fn request_bodies(&self, api_method: &str) -> Vec<String> {
        let suffix = format!("/{}", api_method.to_lowercase());

        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().to_lowercase().ends_with(&suffix))
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }

    /// JSON payloads sent to one Bot API method, in order.
    pub async fn request_json(&self, api_method: &str) -> Vec<Value> {
        self.request_bodies(api_method)
            .await
            .iter()
            .map(|body| serde_json::from_str(body).expect("request body is not json"))
            .collect()
    }
}

pub fn test_config(api_url: url::Url) -> AppConfig {
    AppConfig {
        stage: Stage::Dev,
        telegram_api_token: SecretString::from(TEST_TOKEN.to_string()),
        telegram_api_url: Some(api_url),
        assets_font_path: "static/unused.ttf".into(),
        assets_logo_path: "static/unused.png".into(),
        avatar_jpeg_quality: 95,
    }
}

pub async fn spawn_bot() -> TestBot {
    LazyLock::force(&TELEMETRY);

    let server = MockServer::start().await;
    let config = test_config(server.uri().parse().expect("mock server uri is a url"));
    let bot = build_bot(&config);

    let ctx = BotContext {
        config: Arc::new(config),
        renderer: Arc::new(test_renderer()),
        bot_id: UserId(BOT_ID),
        bot_username: Some(BOT_USERNAME.to_string()),
    };

    TestBot { server, bot, ctx }
}

// Telegram payloads

pub fn user(id: u64, first_name: &str) -> Value {
    json!({
        "id": id,
        "is_bot": false,
        "first_name": first_name
    })
}

pub fn bot_user() -> Value {
    json!({
        "id": BOT_ID,
        "is_bot": true,
        "first_name": "Keeper",
        "username": BOT_USERNAME
    })
}

pub fn group_chat(title: &str) -> Value {
    json!({
        "id": GROUP_ID,
        "type": "supergroup",
        "title": title
    })
}

pub fn private_chat(user_id: u64) -> Value {
    json!({
        "id": user_id,
        "type": "private",
        "first_name": "Alice"
    })
}

/// A message with the common fields filled in and `extra` merged on top.
pub fn message_json(message_id: i32, chat: Value, from: Value, extra: Value) -> Value {
    let mut message = json!({
        "message_id": message_id,
        "date": 1_700_000_000,
        "chat": chat,
        "from": from
    });

    if let (Some(message), Value::Object(extra)) = (message.as_object_mut(), extra) {
        message.extend(extra);
    }

    message
}

pub fn message(message_id: i32, chat: Value, from: Value, extra: Value) -> Message {
    serde_json::from_value(message_json(message_id, chat, from, extra))
        .expect("failed to build a telegram message")
}

/// What the Bot API returns for a message the bot sent.
pub fn sent_message(chat: Value) -> Value {
    message_json(9000, chat, bot_user(), json!({ "text": "ok" }))
}
