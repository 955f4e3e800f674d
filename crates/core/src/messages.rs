//! Static localized message dictionary.
//!
//! Every entry carries its English text as a required field, so a lookup for
//! any key and language always resolves to something.

use serde::Serialize;

use crate::models::{InfoTopic, Language, PageKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    Help,
    NotRecognized,
    AlreadyOnPage,
    NavigatingTo,
    Listening,
    ListenTimeout,
    Unsupported,
    PermissionDenied,
    ProcessingFailed,
    Page(PageKey),
    Topic(InfoTopic),
}

impl MessageKey {
    /// Parses `help`, `not_recognized`, `page.orders`, `topic.payments` and so on.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        if let Some(page) = value.strip_prefix("page.") {
            return PageKey::parse(page).map(Self::Page);
        }
        if let Some(topic) = value.strip_prefix("topic.") {
            return InfoTopic::parse(topic).map(Self::Topic);
        }
        match value.as_str() {
            "help" => Some(Self::Help),
            "not_recognized" => Some(Self::NotRecognized),
            "already_on_page" => Some(Self::AlreadyOnPage),
            "navigating_to" => Some(Self::NavigatingTo),
            "listening" => Some(Self::Listening),
            "listen_timeout" => Some(Self::ListenTimeout),
            "unsupported" => Some(Self::Unsupported),
            "permission_denied" => Some(Self::PermissionDenied),
            "processing_failed" => Some(Self::ProcessingFailed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Localized {
    pub english: &'static str,
    pub hindi: Option<&'static str>,
    pub telugu: Option<&'static str>,
    pub tamil: Option<&'static str>,
}

impl Localized {
    pub fn get(&self, language: Language) -> &'static str {
        self.get_exact(language).unwrap_or(self.english)
    }

    pub fn get_exact(&self, language: Language) -> Option<&'static str> {
        match language {
            Language::English => Some(self.english),
            Language::Hindi => self.hindi,
            Language::Telugu => self.telugu,
            Language::Tamil => self.tamil,
        }
    }
}

const fn full(
    english: &'static str,
    hindi: &'static str,
    telugu: &'static str,
    tamil: &'static str,
) -> Localized {
    Localized {
        english,
        hindi: Some(hindi),
        telugu: Some(telugu),
        tamil: Some(tamil),
    }
}

const fn partial(english: &'static str, hindi: &'static str) -> Localized {
    Localized {
        english,
        hindi: Some(hindi),
        telugu: None,
        tamil: None,
    }
}

pub fn entry(key: MessageKey) -> Localized {
    match key {
        MessageKey::Help => full(
            "I can help you find your way around AgroLink. Try \"go to marketplace\", \"open orders\", or ask \"how do payments work?\"",
            "मैं AgroLink में रास्ता खोजने में आपकी मदद कर सकता हूँ। \"मार्केटप्लेस पर जाएँ\" या \"ऑर्डर खोलें\" कहकर देखें।",
            "AgroLink లో దారి చూపడంలో నేను మీకు సహాయం చేయగలను. \"మార్కెట్‌ప్లేస్‌కు వెళ్ళు\" లేదా \"ఆర్డర్లు తెరువు\" అని చెప్పండి.",
            "AgroLink இல் வழிகாட்ட நான் உதவ முடியும். \"சந்தைக்குச் செல்\" அல்லது \"ஆர்டர்களைத் திற\" என்று சொல்லுங்கள்.",
        ),
        MessageKey::NotRecognized => full(
            "Sorry, I didn't recognize that command. Please try again.",
            "क्षमा करें, मैं वह आदेश नहीं पहचान सका। कृपया फिर से प्रयास करें।",
            "క్షమించండి, ఆ ఆదేశాన్ని నేను గుర్తించలేకపోయాను. దయచేసి మళ్ళీ ప్రయత్నించండి.",
            "மன்னிக்கவும், அந்த கட்டளையை என்னால் அடையாளம் காண முடியவில்லை. மீண்டும் முயற்சிக்கவும்.",
        ),
        MessageKey::AlreadyOnPage => partial(
            "You are already on {page}.",
            "आप पहले से ही {page} पर हैं।",
        ),
        MessageKey::NavigatingTo => full(
            "Navigating to {page}...",
            "{page} पर जा रहे हैं...",
            "{page} కి వెళ్తున్నాం...",
            "{page} க்குச் செல்கிறோம்...",
        ),
        MessageKey::Listening => full(
            "Listening...",
            "सुन रहा हूँ...",
            "వింటున్నాను...",
            "கேட்கிறேன்...",
        ),
        MessageKey::ListenTimeout => partial(
            "I didn't hear anything. Tap the microphone to try again.",
            "मुझे कुछ सुनाई नहीं दिया। फिर से प्रयास करने के लिए माइक्रोफ़ोन दबाएँ।",
        ),
        MessageKey::Unsupported => partial(
            "Voice commands are not supported on this device.",
            "इस डिवाइस पर वॉइस कमांड समर्थित नहीं हैं।",
        ),
        MessageKey::PermissionDenied => partial(
            "Microphone access was denied. Allow microphone access to use voice commands.",
            "माइक्रोफ़ोन की अनुमति नहीं मिली। वॉइस कमांड के लिए माइक्रोफ़ोन की अनुमति दें।",
        ),
        MessageKey::ProcessingFailed => full(
            "Something went wrong while processing your request. Please try again.",
            "आपके अनुरोध को संसाधित करते समय कुछ गलत हो गया। कृपया फिर से प्रयास करें।",
            "మీ అభ్యర్థనను ప్రాసెస్ చేయడంలో లోపం జరిగింది. దయచేసి మళ్ళీ ప్రయత్నించండి.",
            "உங்கள் கோரிக்கையைச் செயலாக்குவதில் பிழை ஏற்பட்டது. மீண்டும் முயற்சிக்கவும்.",
        ),
        MessageKey::Page(page) => page_entry(page),
        MessageKey::Topic(topic) => topic_entry(topic),
    }
}

fn page_entry(page: PageKey) -> Localized {
    match page {
        PageKey::Home => full(
            "Taking you to the home page.",
            "आपको होम पेज पर ले जा रहे हैं।",
            "మిమ్మల్ని హోమ్ పేజీకి తీసుకెళ్తున్నాం.",
            "உங்களை முகப்புப் பக்கத்திற்கு அழைத்துச் செல்கிறோம்.",
        ),
        PageKey::Marketplace => full(
            "Opening the marketplace.",
            "मार्केटप्लेस खोल रहे हैं।",
            "మార్కెట్‌ప్లేస్ తెరుస్తున్నాం.",
            "சந்தையைத் திறக்கிறோம்.",
        ),
        PageKey::FarmerDashboard => partial(
            "Opening the farmer dashboard.",
            "किसान डैशबोर्ड खोल रहे हैं।",
        ),
        PageKey::HubDashboard => partial(
            "Opening the hub dashboard.",
            "हब डैशबोर्ड खोल रहे हैं।",
        ),
        PageKey::RestaurantDashboard => partial(
            "Opening the restaurant dashboard.",
            "रेस्टोरेंट डैशबोर्ड खोल रहे हैं।",
        ),
        PageKey::RetailDashboard => partial(
            "Opening the retail dashboard.",
            "रिटेल डैशबोर्ड खोल रहे हैं।",
        ),
        PageKey::TransportDashboard => partial(
            "Opening the transport dashboard.",
            "परिवहन डैशबोर्ड खोल रहे हैं।",
        ),
        PageKey::CustomerDashboard => partial(
            "Opening your customer dashboard.",
            "आपका ग्राहक डैशबोर्ड खोल रहे हैं।",
        ),
        PageKey::Orders => full(
            "Showing your orders.",
            "आपके ऑर्डर दिखा रहे हैं।",
            "మీ ఆర్డర్లను చూపిస్తున్నాం.",
            "உங்கள் ஆர்டர்களைக் காட்டுகிறோம்.",
        ),
        PageKey::Login => partial("Opening the login page.", "लॉगिन पेज खोल रहे हैं।"),
        PageKey::Register => partial(
            "Opening the registration page.",
            "पंजीकरण पेज खोल रहे हैं।",
        ),
        PageKey::About => Localized {
            english: "Opening the about page.",
            hindi: None,
            telugu: None,
            tamil: None,
        },
        PageKey::Contact => Localized {
            english: "Opening the contact page.",
            hindi: None,
            telugu: None,
            tamil: None,
        },
    }
}

fn topic_entry(topic: InfoTopic) -> Localized {
    match topic {
        InfoTopic::Platform => full(
            "AgroLink connects farmers directly with hubs, restaurants, retailers and customers, with transport partners handling delivery.",
            "AgroLink किसानों को सीधे हब, रेस्टोरेंट, खुदरा विक्रेताओं और ग्राहकों से जोड़ता है, और परिवहन साझेदार डिलीवरी संभालते हैं।",
            "AgroLink రైతులను నేరుగా హబ్‌లు, రెస్టారెంట్లు, రిటైలర్లు మరియు వినియోగదారులతో కలుపుతుంది; రవాణా భాగస్వాములు డెలివరీ చూసుకుంటారు.",
            "AgroLink விவசாயிகளை நேரடியாக மையங்கள், உணவகங்கள், சில்லறை விற்பனையாளர்கள் மற்றும் வாடிக்கையாளர்களுடன் இணைக்கிறது.",
        ),
        InfoTopic::Farmers => partial(
            "Farmers list their produce, set prices and receive orders from hubs and buyers without middlemen.",
            "किसान अपनी उपज सूचीबद्ध करते हैं, कीमत तय करते हैं और बिचौलियों के बिना ऑर्डर प्राप्त करते हैं।",
        ),
        InfoTopic::Hubs => partial(
            "Hubs collect produce from nearby farms, check quality and dispatch orders to buyers in the region.",
            "हब आस-पास के खेतों से उपज इकट्ठा करते हैं, गुणवत्ता जाँचते हैं और क्षेत्र के खरीदारों को ऑर्डर भेजते हैं।",
        ),
        InfoTopic::Transport => partial(
            "Transport partners pick up from hubs and farms, follow planned routes and confirm every delivery.",
            "परिवहन साझेदार हब और खेतों से माल उठाते हैं, तय मार्गों पर चलते हैं और हर डिलीवरी की पुष्टि करते हैं।",
        ),
        InfoTopic::Payments => full(
            "Payments are settled securely after delivery is confirmed. Farmers are paid directly to their bank account.",
            "डिलीवरी की पुष्टि के बाद भुगतान सुरक्षित रूप से किया जाता है। किसानों को सीधे उनके बैंक खाते में भुगतान मिलता है।",
            "డెలివరీ నిర్ధారణ తర్వాత చెల్లింపులు సురక్షితంగా జరుగుతాయి. రైతులకు నేరుగా వారి బ్యాంక్ ఖాతాలో చెల్లిస్తారు.",
            "விநியோகம் உறுதி செய்யப்பட்ட பிறகு பணம் பாதுகாப்பாகச் செலுத்தப்படும். விவசாயிகளுக்கு நேரடியாக வங்கிக் கணக்கில் வழங்கப்படும்.",
        ),
        InfoTopic::Orders => partial(
            "You can place, track and manage orders from your dashboard. Each order shows its current delivery status.",
            "आप अपने डैशबोर्ड से ऑर्डर दे सकते हैं, ट्रैक कर सकते हैं और प्रबंधित कर सकते हैं।",
        ),
        InfoTopic::Sustainability => Localized {
            english: "Shorter supply chains mean fresher produce, less waste and fairer prices for farmers.",
            hindi: None,
            telugu: None,
            tamil: None,
        },
    }
}

/// Translations of the built-in route descriptions. `None` for a label the
/// glossary does not know.
pub fn route_label(description: &str) -> Option<Localized> {
    Some(match description {
        "About" => full("About", "परिचय", "గురించి", "எங்களைப் பற்றி"),
        "Analytics" => full("Analytics", "विश्लेषण", "విశ్లేషణ", "பகுப்பாய்வு"),
        "Browse produce" => full("Browse produce", "उपज सूची", "ఉత్పత్తుల జాబితా", "விளைபொருள் பட்டியல்"),
        "Cart" => full("Cart", "कार्ट", "కార్ట్", "வண்டி"),
        "Contact" => full("Contact", "संपर्क", "సంప్రదింపు", "தொடர்பு"),
        "Crops" => full("Crops", "फसलें", "పంటలు", "பயிர்கள்"),
        "Customer dashboard" => full("Customer dashboard", "ग्राहक डैशबोर्ड", "కస్టమర్ డ్యాష్‌బోర్డ్", "வாடிக்கையாளர் டாஷ்போர்டு"),
        "Deliveries" => full("Deliveries", "डिलीवरी", "డెలివరీలు", "விநியோகங்கள்"),
        "Drivers" => full("Drivers", "ड्राइवर", "డ్రైవర్లు", "ஓட்டுநர்கள்"),
        "Earnings" => full("Earnings", "कमाई", "సంపాదన", "வருமானம்"),
        "Farmer dashboard" => full("Farmer dashboard", "किसान डैशबोर्ड", "రైతు డ్యాష్‌బోర్డ్", "விவசாயி டாஷ்போர்டு"),
        "Farmer network" => full("Farmer network", "किसान नेटवर्क", "రైతు నెట్‌వర్క్", "விவசாயி வலையமைப்பு"),
        "Favorites" => full("Favorites", "पसंदीदा", "ఇష్టమైనవి", "பிடித்தவை"),
        "Fleet" => full("Fleet", "वाहन बेड़ा", "వాహనాలు", "வாகனங்கள்"),
        "Home" => full("Home", "होम", "హోమ్", "முகப்பு"),
        "Hub dashboard" => full("Hub dashboard", "हब डैशबोर्ड", "హబ్ డ్యాష్‌బోర్డ్", "மைய டாஷ்போர்டு"),
        "Inventory" => full("Inventory", "इन्वेंटरी", "ఇన్వెంటరీ", "சரக்கு இருப்பு"),
        "Login" => full("Login", "लॉगिन", "లాగిన్", "உள்நுழைவு"),
        "Logistics" => full("Logistics", "लॉजिस्टिक्स", "లాజిస్టిక్స్", "சரக்கு போக்குவரத்து"),
        "Maintenance" => full("Maintenance", "रखरखाव", "నిర్వహణ", "பராமரிப்பு"),
        "Marketplace" => full("Marketplace", "मार्केटप्लेस", "మార్కెట్‌ప్లేస్", "சந்தை"),
        "Orders" => full("Orders", "ऑर्डर", "ఆర్డర్లు", "ஆர்டர்கள்"),
        "Payments" => full("Payments", "भुगतान", "చెల్లింపులు", "கொடுப்பனவுகள்"),
        "Profile" => full("Profile", "प्रोफ़ाइल", "ప్రొఫైల్", "சுயவிவரம்"),
        "Quality control" => full("Quality control", "गुणवत्ता जाँच", "నాణ్యత తనిఖీ", "தரக் கட்டுப்பாடு"),
        "Registration" => full("Registration", "पंजीकरण", "నమోదు", "பதிவு"),
        "Reports" => full("Reports", "रिपोर्ट", "నివేదికలు", "அறிக்கைகள்"),
        "Restaurant dashboard" => full("Restaurant dashboard", "रेस्टोरेंट डैशबोर्ड", "రెస్టారెంట్ డ్యాష్‌బోర్డ్", "உணவக டாஷ்போர்டு"),
        "Retail dashboard" => full("Retail dashboard", "रिटेल डैशबोर्ड", "రిటైల్ డ్యాష్‌బోర్డ్", "சில்லறை டாஷ்போர்டு"),
        "Route planning" => full("Route planning", "मार्ग योजना", "మార్గ ప్రణాళిక", "பாதை திட்டமிடல்"),
        "Settings" => full("Settings", "सेटिंग्स", "సెట్టింగ్‌లు", "அமைப்புகள்"),
        "Shop" => full("Shop", "दुकान", "షాప్", "கடை"),
        "Subscriptions" => full("Subscriptions", "सदस्यता", "చందాలు", "சந்தாக்கள்"),
        "Suppliers" => full("Suppliers", "आपूर्तिकर्ता", "సరఫరాదారులు", "விநியோகஸ்தர்கள்"),
        "Transport dashboard" => full("Transport dashboard", "परिवहन डैशबोर्ड", "రవాణా డ్యాష్‌బోర్డ్", "போக்குவரத்து டாஷ்போர்டு"),
        "Weather" => full("Weather", "मौसम", "వాతావరణం", "வானிலை"),
        _ => return None,
    })
}

pub fn lookup(key: MessageKey, language: Language) -> &'static str {
    entry(key).get(language)
}

/// Looks up a message and substitutes `{name}` placeholders.
pub fn render(key: MessageKey, language: Language, vars: &[(&str, &str)]) -> String {
    let mut text = lookup(key, language).to_string();
    for (name, value) in vars {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

/// Renders a message about a route. The sentence is either fully in the
/// requested language or fully English: a translated template never carries
/// an English route name, and vice versa.
pub fn render_route(key: MessageKey, language: Language, description: &str) -> String {
    let template = entry(key).get_exact(language);
    let label = route_label(description).and_then(|label| label.get_exact(language));
    match (template, label) {
        (Some(_), Some(label)) => render(key, language, &[("page", label)]),
        _ => render(key, Language::English, &[("page", description)]),
    }
}
