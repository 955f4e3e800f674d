use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
    Tamil,
}

impl Language {
    pub const ALL: [Language; 4] = [Self::English, Self::Hindi, Self::Telugu, Self::Tamil];

    /// Accepts BCP-47 style codes and display names. Anything unknown resolves
    /// to English.
    pub fn from_optional_str(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "hi" || v == "hi-in" || v == "hindi" || v == "हिन्दी" => Self::Hindi,
            Some(v) if v == "te" || v == "te-in" || v == "telugu" || v == "తెలుగు" => {
                Self::Telugu
            }
            Some(v) if v == "ta" || v == "ta-in" || v == "tamil" || v == "தமிழ்" => Self::Tamil,
            _ => Self::English,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Telugu => "te",
            Self::Tamil => "ta",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Telugu => "Telugu",
            Self::Tamil => "Tamil",
        }
    }

    /// Tag handed to speech recognizers and synthesizers.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Self::English => "en-IN",
            Self::Hindi => "hi-IN",
            Self::Telugu => "te-IN",
            Self::Tamil => "ta-IN",
        }
    }
}

/// Deserializes through [`Portal::parse`], so "Hub" and "farmers" are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Portal {
    Farmer,
    Hub,
    Restaurant,
    Retail,
    Transport,
    Customer,
    General,
}

impl Portal {
    pub const ALL: [Portal; 7] = [
        Self::Farmer,
        Self::Hub,
        Self::Restaurant,
        Self::Retail,
        Self::Transport,
        Self::Customer,
        Self::General,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "farmer" | "farmers" => Some(Self::Farmer),
            "hub" | "hubs" => Some(Self::Hub),
            "restaurant" | "restaurants" => Some(Self::Restaurant),
            "retail" | "retailer" => Some(Self::Retail),
            "transport" | "transporter" => Some(Self::Transport),
            "customer" | "customers" => Some(Self::Customer),
            "general" | "global" | "" => Some(Self::General),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Hub => "hub",
            Self::Restaurant => "restaurant",
            Self::Retail => "retail",
            Self::Transport => "transport",
            Self::Customer => "customer",
            Self::General => "general",
        }
    }

    pub fn base_path(self) -> &'static str {
        match self {
            Self::Farmer => "/farmer",
            Self::Hub => "/hub",
            Self::Restaurant => "/restaurant",
            Self::Retail => "/retail",
            Self::Transport => "/transport",
            Self::Customer => "/customer",
            Self::General => "/",
        }
    }
}

impl TryFrom<String> for Portal {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown portal '{value}'"))
    }
}

/// Pages the global assistant is allowed to send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKey {
    Home,
    Marketplace,
    FarmerDashboard,
    HubDashboard,
    RestaurantDashboard,
    RetailDashboard,
    TransportDashboard,
    CustomerDashboard,
    Orders,
    Login,
    Register,
    About,
    Contact,
}

impl PageKey {
    pub const ALL: [PageKey; 13] = [
        Self::Home,
        Self::Marketplace,
        Self::FarmerDashboard,
        Self::HubDashboard,
        Self::RestaurantDashboard,
        Self::RetailDashboard,
        Self::TransportDashboard,
        Self::CustomerDashboard,
        Self::Orders,
        Self::Login,
        Self::Register,
        Self::About,
        Self::Contact,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        let key = value.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|page| page.as_key() == key)
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Marketplace => "marketplace",
            Self::FarmerDashboard => "farmer_dashboard",
            Self::HubDashboard => "hub_dashboard",
            Self::RestaurantDashboard => "restaurant_dashboard",
            Self::RetailDashboard => "retail_dashboard",
            Self::TransportDashboard => "transport_dashboard",
            Self::CustomerDashboard => "customer_dashboard",
            Self::Orders => "orders",
            Self::Login => "login",
            Self::Register => "register",
            Self::About => "about",
            Self::Contact => "contact",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Marketplace => "/marketplace",
            Self::FarmerDashboard => "/farmer/dashboard",
            Self::HubDashboard => "/hub/dashboard",
            Self::RestaurantDashboard => "/restaurant/dashboard",
            Self::RetailDashboard => "/retail/dashboard",
            Self::TransportDashboard => "/transport/dashboard",
            Self::CustomerDashboard => "/customer/dashboard",
            Self::Orders => "/orders",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::About => "/about",
            Self::Contact => "/contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "home page",
            Self::Marketplace => "marketplace",
            Self::FarmerDashboard => "farmer dashboard",
            Self::HubDashboard => "hub dashboard",
            Self::RestaurantDashboard => "restaurant dashboard",
            Self::RetailDashboard => "retail dashboard",
            Self::TransportDashboard => "transport dashboard",
            Self::CustomerDashboard => "customer dashboard",
            Self::Orders => "orders",
            Self::Login => "login page",
            Self::Register => "registration page",
            Self::About => "about page",
            Self::Contact => "contact page",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoTopic {
    Platform,
    Farmers,
    Hubs,
    Transport,
    Payments,
    Orders,
    Sustainability,
}

impl InfoTopic {
    pub const ALL: [InfoTopic; 7] = [
        Self::Platform,
        Self::Farmers,
        Self::Hubs,
        Self::Transport,
        Self::Payments,
        Self::Orders,
        Self::Sustainability,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        let key = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|topic| topic.as_key() == key)
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Farmers => "farmers",
            Self::Hubs => "hubs",
            Self::Transport => "transport",
            Self::Payments => "payments",
            Self::Orders => "orders",
            Self::Sustainability => "sustainability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Navigate,
    Information,
    Help,
    None,
}

impl Intent {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "navigate" | "navigation" => Self::Navigate,
            "information" | "info" => Self::Information,
            "help" => Self::Help,
            _ => Self::None,
        }
    }
}

/// A transcript as it leaves speech-to-text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub text: String,
    pub language: Language,
}

impl Command {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInput {
    pub portal: Portal,
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub current_path: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantInput {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Raw structured output of the intent model. Keys stay as strings so that
/// values outside the known tables can still be reported back to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub intent: String,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default, alias = "informationTopic", alias = "topic")]
    pub info_topic: Option<String>,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Blank transcript; nothing happens.
    Ignored,
    Navigate {
        path: String,
        description: String,
        message: String,
    },
    AlreadyOnRoute {
        path: String,
        message: String,
    },
    NotRecognized {
        message: String,
    },
}

impl CommandOutcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ignored => None,
            Self::Navigate { message, .. }
            | Self::AlreadyOnRoute { message, .. }
            | Self::NotRecognized { message } => Some(message),
        }
    }

    pub fn navigation_target(&self) -> Option<&str> {
        match self {
            Self::Navigate { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Navigate,
    Information,
    Help,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub kind: ReplyKind,
    pub message: String,
    pub path: Option<String>,
    pub page: Option<PageKey>,
    pub topic: Option<InfoTopic>,
    pub confidence: f32,
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(Language::from_optional_str(Some("klingon")), Language::English);
        assert_eq!(Language::from_optional_str(None), Language::English);
        assert_eq!(Language::from_optional_str(Some(" Hindi ")), Language::Hindi);
        assert_eq!(Language::from_optional_str(Some("te-IN")), Language::Telugu);
    }

    #[test]
    fn portal_deserializes_through_aliases() {
        let portal: Portal = serde_json::from_str(r#"" Hub ""#).unwrap();
        assert_eq!(portal, Portal::Hub);
        let portal: Portal = serde_json::from_str(r#""farmers""#).unwrap();
        assert_eq!(portal, Portal::Farmer);
        assert_eq!(serde_json::to_string(&Portal::Transport).unwrap(), r#""transport""#);

        let err = serde_json::from_str::<Portal>(r#""spaceport""#).unwrap_err();
        assert!(err.to_string().contains("unknown portal 'spaceport'"));
    }

    #[test]
    fn page_keys_parse_loosely() {
        assert_eq!(PageKey::parse("Hub Dashboard"), Some(PageKey::HubDashboard));
        assert_eq!(PageKey::parse("farmer-dashboard"), Some(PageKey::FarmerDashboard));
        assert_eq!(PageKey::parse("weather"), None);
    }

    #[test]
    fn verdict_accepts_camel_case_topic() {
        let verdict: ModelVerdict = serde_json::from_str(
            r#"{"intent":"information","informationTopic":"payments","confidence":0.9}"#,
        )
        .unwrap();
        assert_eq!(verdict.info_topic.as_deref(), Some("payments"));
        assert_eq!(Intent::parse(&verdict.intent), Intent::Information);
    }
}
