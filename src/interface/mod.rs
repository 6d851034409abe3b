pub mod prompts;
pub mod render;

pub use prompts::{
    collect_plan_request, match_ingredients, prompt_dog, prompt_kibble, prompt_meals,
    prompt_mer_factor, prompt_recipe, prompt_yes_no,
};
pub use render::{display_ingredient_list, display_meal_plan, display_mer_factors, write_plan_csv};
