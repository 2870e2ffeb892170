//! Endpoint registry.
//!
//! Every remote operation the client knows about is enumerated in [`Api`], and each
//! maps to a static [`EndpointSpec`] describing the request shape: which path it
//! targets, what a single input item looks like, whether it accepts batches, and
//! whether it only exists on private clouds.

use std::fmt;

/// Side length of the face crops expected by the facial endpoints.
pub const FACE_SIDE: usize = 48;

/// What one input item of an endpoint looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    /// The operation sends no `data` field.
    None,
    Text,
    /// An image. `pixels` is the expected length of a raw pixel array, if fixed.
    Image { pixels: Option<usize> },
    /// Text or image, decided per call.
    TextOrImage,
    /// An `[item, target]` training pair.
    Labeled,
}

/// Static request-shape metadata for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// First path segment, e.g. `"sentiment"` or `"apis/multiapi"`.
    pub path: &'static str,
    /// Trailing method segment, e.g. `"add_data"` on the collection API.
    pub method: Option<&'static str>,
    pub item: ItemShape,
    pub batch_capable: bool,
    pub private_only: bool,
}

/// All operations exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    Sentiment,
    SentimentHq,
    Political,
    Language,
    TextTags,
    Keywords,
    NamedEntities,
    Fer,
    FacialFeatures,
    ImageFeatures,
    ContentFiltering,
    MultiText,
    MultiImage,
    AddData,
    TrainCollection,
    PredictCollection,
    ClearCollection,
    RemoveExample,
    Collections,
    TrainExample,
    Labels,
}

const fn public(path: &'static str, item: ItemShape) -> EndpointSpec {
    EndpointSpec {
        path,
        method: None,
        item,
        batch_capable: true,
        private_only: false,
    }
}

const fn custom(method: &'static str, item: ItemShape, batch_capable: bool) -> EndpointSpec {
    EndpointSpec {
        path: "custom",
        method: Some(method),
        item,
        batch_capable,
        private_only: true,
    }
}

const FACE: ItemShape = ItemShape::Image {
    pixels: Some(FACE_SIDE * FACE_SIDE),
};
const ANY_IMAGE: ItemShape = ItemShape::Image { pixels: None };

impl Api {
    pub const ALL: [Api; 21] = [
        Api::Sentiment,
        Api::SentimentHq,
        Api::Political,
        Api::Language,
        Api::TextTags,
        Api::Keywords,
        Api::NamedEntities,
        Api::Fer,
        Api::FacialFeatures,
        Api::ImageFeatures,
        Api::ContentFiltering,
        Api::MultiText,
        Api::MultiImage,
        Api::AddData,
        Api::TrainCollection,
        Api::PredictCollection,
        Api::ClearCollection,
        Api::RemoveExample,
        Api::Collections,
        Api::TrainExample,
        Api::Labels,
    ];

    pub fn spec(self) -> EndpointSpec {
        match self {
            Api::Sentiment => public("sentiment", ItemShape::Text),
            Api::SentimentHq => public("sentimenthq", ItemShape::Text),
            Api::Political => public("political", ItemShape::Text),
            Api::Language => public("language", ItemShape::Text),
            Api::TextTags => public("texttags", ItemShape::Text),
            Api::Keywords => public("keywords", ItemShape::Text),
            Api::NamedEntities => public("namedentities", ItemShape::Text),
            Api::Fer => public("fer", FACE),
            Api::FacialFeatures => public("facialfeatures", FACE),
            Api::ImageFeatures => public("imagefeatures", ANY_IMAGE),
            Api::ContentFiltering => public("contentfiltering", ANY_IMAGE),
            Api::MultiText => public("apis/multiapi", ItemShape::Text),
            Api::MultiImage => public("apis/multiapi", ANY_IMAGE),
            // Uploading examples is open to every account; the rest of the
            // collection API lives on private clouds.
            Api::AddData => EndpointSpec {
                private_only: false,
                ..custom("add_data", ItemShape::Labeled, true)
            },
            // The caller supplies nothing; `Collection::train` sends the name as data.
            Api::TrainCollection => custom("train", ItemShape::None, false),
            // Predictions go to the bare collection path.
            Api::PredictCollection => EndpointSpec {
                method: None,
                ..custom("predict", ItemShape::TextOrImage, true)
            },
            Api::ClearCollection => custom("clear_collection", ItemShape::None, false),
            Api::RemoveExample => custom("remove_example", ItemShape::TextOrImage, true),
            Api::Collections => custom("collections", ItemShape::None, false),
            Api::TrainExample => EndpointSpec {
                path: "train",
                method: None,
                item: ItemShape::Labeled,
                batch_capable: true,
                private_only: true,
            },
            Api::Labels => EndpointSpec {
                path: "labels",
                method: None,
                item: ItemShape::None,
                batch_capable: false,
                private_only: true,
            },
        }
    }

    /// Stable snake_case name, as used by the CLI and the multi-API `apis` list.
    pub fn name(self) -> &'static str {
        match self {
            Api::Sentiment => "sentiment",
            Api::SentimentHq => "sentiment_hq",
            Api::Political => "political",
            Api::Language => "language",
            Api::TextTags => "text_tags",
            Api::Keywords => "keywords",
            Api::NamedEntities => "named_entities",
            Api::Fer => "fer",
            Api::FacialFeatures => "facial_features",
            Api::ImageFeatures => "image_features",
            Api::ContentFiltering => "content_filtering",
            Api::MultiText => "predict_text",
            Api::MultiImage => "predict_image",
            Api::AddData => "add_data",
            Api::TrainCollection => "train",
            Api::PredictCollection => "predict",
            Api::ClearCollection => "clear_collection",
            Api::RemoveExample => "remove_example",
            Api::Collections => "collections",
            Api::TrainExample => "train_example",
            Api::Labels => "labels",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|api| api.name() == name)
    }

    /// Text operations that can be combined in one multi-API request.
    pub fn is_multi_text_member(self) -> bool {
        matches!(
            self,
            Api::Sentiment
                | Api::SentimentHq
                | Api::Political
                | Api::Language
                | Api::TextTags
                | Api::Keywords
                | Api::NamedEntities
        )
    }

    /// Image operations that can be combined in one multi-API request.
    pub fn is_multi_image_member(self) -> bool {
        matches!(
            self,
            Api::Fer | Api::FacialFeatures | Api::ImageFeatures | Api::ContentFiltering
        )
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
