use super::Question;

/// A question blueprint living in a fixed template set. Ids are assigned
/// later, once a session's selection is shuffled and truncated.
struct Template {
    prompt: &'static str,
    options: [&'static str; 4],
    correct: usize,
    explanation: &'static str,
}

impl Template {
    fn instantiate(&self) -> Question {
        Question {
            id: 0,
            prompt: self.prompt.to_string(),
            options: self.options.iter().map(|o| o.to_string()).collect(),
            correct_answer: self.correct,
            explanation: self.explanation.to_string(),
        }
    }
}

/// Ordered topic matching rules, first match wins. The bare "js" keyword is
/// checked after "react" so that topics like "ReactJS basics" land on the
/// React set instead of the JavaScript one.
static TOPIC_RULES: [(&[&str], &[Template]); 5] = [
    (&["javascript"], &JAVASCRIPT),
    (&["react", "reactjs"], &REACT),
    (&["python"], &PYTHON),
    (&["aws", "amazon"], &AWS),
    (&["js"], &JAVASCRIPT),
];

/// Picks the template set for a topic: trim + lowercase, substring match
/// against the rules above, generic fallback for everything else. Never
/// fails; an empty topic simply gets the generic set.
pub(super) fn for_topic(topic: &str) -> Vec<Question> {
    let normalized = topic.trim().to_lowercase();
    for (keywords, set) in TOPIC_RULES.iter() {
        if keywords.iter().any(|keyword| normalized.contains(keyword)) {
            return set.iter().map(Template::instantiate).collect();
        }
    }
    generic(topic)
}

static JAVASCRIPT: [Template; 10] = [
    Template {
        prompt: "What is the output of typeof null in JavaScript?",
        options: ["'null'", "'object'", "'undefined'", "'boolean'"],
        correct: 1,
        explanation: "In JavaScript, typeof null returns 'object'. This is a known bug in JavaScript that has been kept for backward compatibility.",
    },
    Template {
        prompt: "Which method is used to add elements to the end of an array?",
        options: ["unshift()", "push()", "pop()", "shift()"],
        correct: 1,
        explanation: "The push() method adds one or more elements to the end of an array and returns the new length of the array.",
    },
    Template {
        prompt: "What is a closure in JavaScript?",
        options: [
            "A function that returns another function",
            "A function bundled with its lexical scope",
            "A method to close browser windows",
            "A loop control structure",
        ],
        correct: 1,
        explanation: "A closure is a function bundled together with references to its surrounding state (lexical environment).",
    },
    Template {
        prompt: "What does 'use strict' do in JavaScript?",
        options: [
            "Makes code run faster",
            "Enables strict mode with additional error checking",
            "Compresses the code",
            "Enables TypeScript features",
        ],
        correct: 1,
        explanation: "'use strict' enables strict mode which catches common coding mistakes and prevents unsafe actions.",
    },
    Template {
        prompt: "Which of the following is NOT a JavaScript data type?",
        options: ["Boolean", "Float", "Symbol", "BigInt"],
        correct: 1,
        explanation: "Float is not a JavaScript data type. JavaScript uses Number for all numeric values.",
    },
    Template {
        prompt: "What is event bubbling?",
        options: [
            "Creating multiple events",
            "Events propagating from child to parent",
            "Event memory leaks",
            "Asynchronous event handling",
        ],
        correct: 1,
        explanation: "Event bubbling is when an event triggers on a nested element and propagates up through its ancestors.",
    },
    Template {
        prompt: "What is the purpose of the 'this' keyword?",
        options: [
            "To declare variables",
            "To reference the current object",
            "To import modules",
            "To create loops",
        ],
        correct: 1,
        explanation: "The 'this' keyword refers to the object that is executing the current function.",
    },
    Template {
        prompt: "What is a Promise in JavaScript?",
        options: [
            "A guarantee of code execution",
            "An object representing eventual completion of async operation",
            "A loop structure",
            "A variable declaration",
        ],
        correct: 1,
        explanation: "A Promise is an object representing the eventual completion or failure of an asynchronous operation.",
    },
    Template {
        prompt: "What is the difference between == and ===?",
        options: [
            "No difference",
            "=== checks type and value, == only checks value",
            "== is deprecated",
            "=== is faster",
        ],
        correct: 1,
        explanation: "=== (strict equality) checks both type and value, while == (loose equality) performs type coercion before comparison.",
    },
    Template {
        prompt: "What is hoisting in JavaScript?",
        options: [
            "Moving code to the top of the file",
            "Moving declarations to the top of their scope",
            "Optimizing code performance",
            "A debugging technique",
        ],
        correct: 1,
        explanation: "Hoisting is JavaScript's behavior of moving declarations to the top of their scope during compilation.",
    },
];

static REACT: [Template; 10] = [
    Template {
        prompt: "What is the virtual DOM in React?",
        options: [
            "A browser feature",
            "A lightweight copy of the real DOM",
            "A CSS framework",
            "A testing tool",
        ],
        correct: 1,
        explanation: "The virtual DOM is a lightweight JavaScript representation of the real DOM that React uses for efficient updates.",
    },
    Template {
        prompt: "What hook is used for side effects in React?",
        options: ["useState", "useEffect", "useContext", "useReducer"],
        correct: 1,
        explanation: "useEffect is used to perform side effects in functional components, such as data fetching or subscriptions.",
    },
    Template {
        prompt: "What is JSX?",
        options: [
            "A JavaScript library",
            "A syntax extension for JavaScript",
            "A CSS preprocessor",
            "A testing framework",
        ],
        correct: 1,
        explanation: "JSX is a syntax extension for JavaScript that allows you to write HTML-like code in JavaScript files.",
    },
    Template {
        prompt: "What is the purpose of keys in React lists?",
        options: [
            "Styling elements",
            "Helping React identify which items changed",
            "Creating unique IDs",
            "Encrypting data",
        ],
        correct: 1,
        explanation: "Keys help React identify which items in a list have changed, been added, or removed for efficient re-rendering.",
    },
    Template {
        prompt: "What is useState used for?",
        options: ["Managing component state", "Routing", "API calls", "Styling"],
        correct: 0,
        explanation: "useState is a Hook that lets you add state to functional components.",
    },
    Template {
        prompt: "What is prop drilling?",
        options: [
            "A testing technique",
            "Passing props through many component levels",
            "Creating new components",
            "Debugging props",
        ],
        correct: 1,
        explanation: "Prop drilling is passing props through multiple levels of components to reach a deeply nested component.",
    },
    Template {
        prompt: "What is React.memo used for?",
        options: [
            "Memory management",
            "Memoizing components to prevent unnecessary re-renders",
            "Creating memos",
            "Documentation",
        ],
        correct: 1,
        explanation: "React.memo is a higher-order component that memoizes a component to skip re-renders if props haven't changed.",
    },
    Template {
        prompt: "What is the Context API used for?",
        options: [
            "Creating APIs",
            "Sharing state across components without prop drilling",
            "Styling",
            "Testing",
        ],
        correct: 1,
        explanation: "The Context API provides a way to share values between components without passing props manually at every level.",
    },
    Template {
        prompt: "What is a controlled component?",
        options: [
            "A component with access control",
            "A component where form data is handled by React state",
            "A styled component",
            "A tested component",
        ],
        correct: 1,
        explanation: "A controlled component is a form element whose value is controlled by React state.",
    },
    Template {
        prompt: "What is the useCallback hook used for?",
        options: [
            "Making API calls",
            "Memoizing callback functions",
            "Creating callbacks",
            "Error handling",
        ],
        correct: 1,
        explanation: "useCallback returns a memoized callback function that only changes if one of its dependencies has changed.",
    },
];

static PYTHON: [Template; 10] = [
    Template {
        prompt: "What is a Python decorator?",
        options: [
            "A design pattern",
            "A function that modifies another function",
            "A class attribute",
            "A loop structure",
        ],
        correct: 1,
        explanation: "A decorator is a function that takes another function and extends its behavior without explicitly modifying it.",
    },
    Template {
        prompt: "What is the difference between a list and a tuple?",
        options: [
            "Lists are immutable",
            "Tuples are immutable",
            "No difference",
            "Lists use parentheses",
        ],
        correct: 1,
        explanation: "Tuples are immutable (cannot be changed after creation), while lists are mutable.",
    },
    Template {
        prompt: "What is a lambda function in Python?",
        options: ["A named function", "An anonymous function", "A class method", "A module"],
        correct: 1,
        explanation: "A lambda function is a small anonymous function that can have any number of arguments but only one expression.",
    },
    Template {
        prompt: "What does the 'self' keyword represent?",
        options: ["The module", "The instance of the class", "A variable", "A method"],
        correct: 1,
        explanation: "'self' represents the instance of the class and is used to access class attributes and methods.",
    },
    Template {
        prompt: "What is a generator in Python?",
        options: [
            "A code generator tool",
            "A function that yields values one at a time",
            "A class factory",
            "An IDE plugin",
        ],
        correct: 1,
        explanation: "A generator is a function that returns an iterator that yields values one at a time using the yield keyword.",
    },
    Template {
        prompt: "What is PEP 8?",
        options: ["A Python version", "Python style guide", "A Python library", "A testing framework"],
        correct: 1,
        explanation: "PEP 8 is the style guide for Python code that provides conventions for writing readable code.",
    },
    Template {
        prompt: "What is the GIL in Python?",
        options: [
            "A graphics library",
            "Global Interpreter Lock",
            "A GUI framework",
            "A garbage collector",
        ],
        correct: 1,
        explanation: "The Global Interpreter Lock (GIL) is a mutex that protects access to Python objects, limiting threading efficiency.",
    },
    Template {
        prompt: "What is list comprehension?",
        options: [
            "Understanding lists",
            "A concise way to create lists",
            "A list method",
            "A debugging tool",
        ],
        correct: 1,
        explanation: "List comprehension is a concise way to create lists using a single line of code with brackets and an expression.",
    },
    Template {
        prompt: "What is __init__ in Python?",
        options: ["A module", "The constructor method", "A private variable", "A destructor"],
        correct: 1,
        explanation: "__init__ is the constructor method that gets called when an object is instantiated.",
    },
    Template {
        prompt: "What is the difference between 'is' and '=='?",
        options: [
            "No difference",
            "'is' checks identity, '==' checks equality",
            "'is' is deprecated",
            "'==' checks identity",
        ],
        correct: 1,
        explanation: "'is' checks if two variables reference the same object in memory, while '==' checks if their values are equal.",
    },
];

static AWS: [Template; 10] = [
    Template {
        prompt: "What is Amazon EC2?",
        options: [
            "A database service",
            "A virtual server in the cloud",
            "A storage service",
            "A CDN service",
        ],
        correct: 1,
        explanation: "Amazon EC2 (Elastic Compute Cloud) provides resizable virtual servers (instances) in the cloud.",
    },
    Template {
        prompt: "What is an S3 bucket?",
        options: [
            "A compute instance",
            "A container for storing objects",
            "A database table",
            "A network configuration",
        ],
        correct: 1,
        explanation: "An S3 bucket is a container for storing objects (files) in Amazon Simple Storage Service.",
    },
    Template {
        prompt: "What is AWS Lambda?",
        options: [
            "A serverless compute service",
            "A database service",
            "A storage service",
            "A networking service",
        ],
        correct: 0,
        explanation: "AWS Lambda is a serverless compute service that runs code without provisioning or managing servers.",
    },
    Template {
        prompt: "What is the purpose of IAM?",
        options: [
            "Image management",
            "Identity and Access Management",
            "Instance monitoring",
            "Internet access management",
        ],
        correct: 1,
        explanation: "IAM (Identity and Access Management) manages access to AWS services and resources securely.",
    },
    Template {
        prompt: "What is Amazon RDS?",
        options: [
            "A managed relational database service",
            "A routing service",
            "A real-time data service",
            "A reporting service",
        ],
        correct: 0,
        explanation: "Amazon RDS (Relational Database Service) is a managed service that makes it easy to set up and operate relational databases.",
    },
    Template {
        prompt: "What is a VPC in AWS?",
        options: [
            "Virtual Private Cloud",
            "Virtual Public Compute",
            "Very Private Connection",
            "Virtual Protocol Configuration",
        ],
        correct: 0,
        explanation: "A VPC (Virtual Private Cloud) is a logically isolated virtual network in AWS.",
    },
    Template {
        prompt: "What is CloudFront?",
        options: [
            "A firewall service",
            "A content delivery network (CDN)",
            "A monitoring tool",
            "A database service",
        ],
        correct: 1,
        explanation: "Amazon CloudFront is a fast content delivery network (CDN) service for delivering data and applications globally.",
    },
    Template {
        prompt: "What is the AWS Shared Responsibility Model?",
        options: [
            "Cost sharing between teams",
            "Security responsibilities divided between AWS and customer",
            "Data sharing policy",
            "Resource allocation model",
        ],
        correct: 1,
        explanation: "The Shared Responsibility Model defines what AWS is responsible for (security of the cloud) vs what customers are responsible for (security in the cloud).",
    },
    Template {
        prompt: "What is an Availability Zone?",
        options: [
            "A time zone",
            "An isolated location within an AWS region",
            "A pricing tier",
            "A security group",
        ],
        correct: 1,
        explanation: "An Availability Zone is one or more isolated data centers within an AWS region with independent power and networking.",
    },
    Template {
        prompt: "What is Elastic Load Balancing?",
        options: [
            "A storage feature",
            "A service that distributes incoming traffic",
            "A pricing model",
            "A backup service",
        ],
        correct: 1,
        explanation: "Elastic Load Balancing automatically distributes incoming application traffic across multiple targets.",
    },
];

/// Fallback questions for topics with no dedicated set. The literal,
/// non-normalized topic string is interpolated into prompts and explanations.
fn generic(topic: &str) -> Vec<Question> {
    let question = |prompt: String, options: [&str; 4], correct: usize, explanation: String| {
        Question {
            id: 0,
            prompt,
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct,
            explanation,
        }
    };

    vec![
        question(
            format!("What is the primary purpose of {topic}?"),
            [
                "To solve complex problems",
                "To improve efficiency",
                "To enable new capabilities",
                "All of the above",
            ],
            3,
            format!("{topic} is designed to address multiple needs including problem-solving, efficiency, and enabling new capabilities."),
        ),
        question(
            format!("Which of the following best describes {topic}?"),
            ["A methodology", "A technology", "A framework", "It depends on the context"],
            3,
            format!("The nature of {topic} can vary based on how it's applied and in what context."),
        ),
        question(
            format!("What is a key benefit of using {topic}?"),
            [
                "Increased productivity",
                "Better organization",
                "Improved outcomes",
                "All of the above",
            ],
            3,
            format!("{topic} typically provides multiple benefits including productivity, organization, and improved outcomes."),
        ),
        question(
            format!("When should you consider using {topic}?"),
            [
                "When facing complex challenges",
                "When scaling operations",
                "When optimizing processes",
                "All of the above",
            ],
            3,
            format!("{topic} is valuable in various scenarios including complex challenges, scaling, and optimization."),
        ),
        question(
            format!("What is a common challenge when implementing {topic}?"),
            [
                "Learning curve",
                "Resource requirements",
                "Integration complexity",
                "All of the above",
            ],
            3,
            format!("Implementing {topic} often involves multiple challenges that need to be addressed."),
        ),
        question(
            format!("Which skill is most important for {topic}?"),
            ["Technical knowledge", "Problem-solving", "Communication", "Adaptability"],
            1,
            format!("While all skills are valuable, problem-solving is fundamental to working with {topic}."),
        ),
        question(
            format!("What is the future outlook for {topic}?"),
            ["Declining relevance", "Stable adoption", "Growing importance", "Uncertain"],
            2,
            "Most emerging technologies and methodologies show growing importance in their respective fields.".to_string(),
        ),
        question(
            format!("How can you measure success with {topic}?"),
            ["Performance metrics", "User satisfaction", "Business outcomes", "All of the above"],
            3,
            format!("Success with {topic} should be measured using multiple metrics and indicators."),
        ),
        question(
            format!("What is the first step in learning {topic}?"),
            [
                "Understanding fundamentals",
                "Building projects",
                "Reading documentation",
                "Joining communities",
            ],
            0,
            "Understanding the fundamentals is typically the first and most important step in learning any new topic.".to_string(),
        ),
        question(
            format!("Which industry benefits most from {topic}?"),
            ["Technology", "Healthcare", "Finance", "All industries can benefit"],
            3,
            format!("{topic} has applications across multiple industries, each benefiting in different ways."),
        ),
    ]
}
