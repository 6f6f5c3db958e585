/// Artistic transformation styles offered to the restyle service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtStyle {
    Renaissance,
    Watercolor,
    Chinese,
    Comic,
    Photography,
    Cyberpunk,
    Anime,
    Manga,
    ThreeD,
    Custom,
}

/// Label/prompt pair identifying which artistic transformation to request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleDescriptor {
    pub id: ArtStyle,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

pub const STYLE_CATALOG: &[StyleDescriptor] = &[
    StyleDescriptor {
        id: ArtStyle::Renaissance,
        label: "文艺复兴",
        icon: "🏛️",
        description: "古典油画，戏剧性的光影，真实的纹理",
        prompt: "Transform this image into a classic Renaissance oil painting style. Use dramatic chiaroscuro (light and shadow), rich earthy textures, and realistic human features reminiscent of Leonardo da Vinci or Raphael. Preserve the original composition.",
    },
    StyleDescriptor {
        id: ArtStyle::Watercolor,
        label: "水彩艺术",
        icon: "🎨",
        description: "柔和的边缘，晕染的色彩，艺术感十足",
        prompt: "Transform this image into a beautiful watercolor painting. Use soft edges, delicate color bleeds, visible paper texture, and artistic brush strokes. The colors should feel vibrant yet translucent.",
    },
    StyleDescriptor {
        id: ArtStyle::Chinese,
        label: "水墨国画",
        icon: "🏮",
        description: "传统水墨，写意线条，禅意留白",
        prompt: "Transform this image into a traditional Chinese ink wash painting (Shuimo) style. Use expressive black ink brushstrokes, varying ink density, elegant compositions, and soft parchment paper texture.",
    },
    StyleDescriptor {
        id: ArtStyle::Comic,
        label: "美漫风格",
        icon: "💥",
        description: "美式英雄漫画，粗旷线条，明亮色彩",
        prompt: "Reimagine this image as a classic American superhero comic book illustration. Use heavy black line work, dramatic shadows, Ben-Day dots or halftone patterns, and a vibrant primary color palette. The style should be bold, energetic, and high-contrast.",
    },
    StyleDescriptor {
        id: ArtStyle::Photography,
        label: "摄影大片",
        icon: "📸",
        description: "专业摄影，电影光感，极致细节",
        prompt: "Transform this image into a high-end professional photographic masterpiece. Enhance details to look like a National Geographic or editorial fashion shoot. Use shallow depth of field with beautiful background bokeh, expert studio lighting or golden hour natural light, and sophisticated color grading.",
    },
    StyleDescriptor {
        id: ArtStyle::Cyberpunk,
        label: "赛博朋克",
        icon: "🌃",
        description: "霓虹灯光，未来感，高科技氛围",
        prompt: "Redesign this image in a cyberpunk aesthetic. Add glowing neon lights in pink, blue, and purple. Incorporate high-tech interface elements, a futuristic urban atmosphere, and a dark, moody high-contrast color palette.",
    },
    StyleDescriptor {
        id: ArtStyle::Anime,
        label: "唯美动漫",
        icon: "🌸",
        description: "新海诚风格，明亮色彩，治愈感",
        prompt: "Convert this into a high-quality modern anime style, similar to Makoto Shinkai movies. Use bright vibrant colors, detailed sky and backgrounds, clean line art, and a cinematic emotional atmosphere.",
    },
    StyleDescriptor {
        id: ArtStyle::Manga,
        label: "二次元",
        icon: "✨",
        description: "日漫风格，平铺上色，动感线条",
        prompt: "Redraw this in a clean 2D manga/illustration style. Use bold outlines, cel-shaded coloring, and characteristic anime eyes and expressions. The result should look like a professional character illustration.",
    },
    StyleDescriptor {
        id: ArtStyle::ThreeD,
        label: "3D 渲染",
        icon: "🧊",
        description: "皮克斯风格，软萌建模，柔和光照",
        prompt: "Convert this image into a 3D Pixar-style or high-end Unreal Engine 5 render. Features should be slightly stylized and cute with rounded edges, soft global illumination, and realistic material textures like fabric or plastic.",
    },
];

impl ArtStyle {
    pub fn descriptor(self) -> Option<&'static StyleDescriptor> {
        STYLE_CATALOG.iter().find(|s| s.id == self)
    }
}
